//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ad_harvest::config::{load_config, CategoryCatalog, CategoryEntry, Config};
use ad_harvest::crawler::Coordinator;
use ad_harvest::output::{load_dataset, save_dataset};
use ad_harvest::{HarvestError, Skipped};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORY_PATH: &str = "/categorie/chiens";

/// Creates a test configuration with one category served by the mock server
fn create_test_config(base_url: &str, data_dir: &str) -> Config {
    let mut config = Config::default();
    config.crawler.page_delay_ms = 0;
    config.crawler.listing_timeout_secs = 5;
    config.retry.max_attempts = 3;
    config.retry.backoff_ms = 0;
    config.retry.timeout_secs = 5;
    config.output.data_dir = data_dir.to_string();
    config.categories = vec![CategoryEntry {
        name: "Dogs".to_string(),
        url: format!("{}{}", base_url, CATEGORY_PATH),
        slug: None,
    }];
    config
}

fn listing_page(hrefs: &[&str]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="col s6 m4 l3"><div class="card"><a href="{}">Voir</a></div></div>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="row">{}</div></body></html>"#,
        cards
    )
}

fn ad_page(title: &str, price: &str, address: Option<&str>) -> String {
    let address = address
        .map(|a| format!(r#"<span data-address="{}">{}</span>"#, a, a))
        .unwrap_or_default();
    format!(
        r#"<html><body>
        <h1>{}</h1>
        <p class="price">{}</p>
        {}
        <div class="swiper-wrapper">
            <div class="swiper-slide" style="background-image: url('https://img.example.com/{}.jpg');"></div>
        </div>
        </body></html>"#,
        title,
        price,
        address,
        title.to_lowercase().replace(' ', "-")
    )
}

async fn mount_listing(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_ad(server: &MockServer, ad_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(ad_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        listing_page(&["/annonce/chiens/berger-1", "/annonce/chiens/caniche-2"]),
    )
    .await;
    mount_listing(&mock_server, "2", listing_page(&[])).await;

    mount_ad(
        &mock_server,
        "/annonce/chiens/berger-1",
        ad_page("Berger allemand", "150 000 CFA", Some("Dakar, Sénégal")),
    )
    .await;
    mount_ad(
        &mock_server,
        "/annonce/chiens/caniche-2",
        ad_page("Caniche", "75 000 CFA", None),
    )
    .await;

    let config = create_test_config(&base_url, "unused");
    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");

    let mut progress = Vec::new();
    let result = coordinator
        .crawl_with_progress("Dogs", 2, |page, total| progress.push((page, total)))
        .await
        .expect("Crawl failed");

    assert_eq!(progress, vec![(1, 2), (2, 2)]);
    assert_eq!(result.pages_attempted, 2);
    assert_eq!(result.len(), 2);
    assert!(result.skipped.is_empty());

    let first = &result.records[0];
    assert_eq!(first.title(), "Berger allemand");
    assert_eq!(first.price(), "150 000");
    assert_eq!(first.address(), "Dakar, Sénégal");
    assert_eq!(first.image_url(), "https://img.example.com/berger-allemand.jpg");

    let second = &result.records[1];
    assert_eq!(second.title(), "Caniche");
    assert_eq!(second.address(), "N/A");
}

#[tokio::test]
async fn test_unavailable_listing_pages_yield_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused");
    let result = Coordinator::from_config(&config)
        .unwrap()
        .crawl("Dogs", 3)
        .await
        .expect("An unreachable site is not an error");

    assert!(result.is_empty());
    assert_eq!(result.pages_attempted, 3);
    assert_eq!(result.pages_skipped(), 3);
}

#[tokio::test]
async fn test_flaky_ad_is_retried() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "1", listing_page(&["/annonce/chiens/flaky-3"])).await;

    // Mounted first, so it answers the first two requests
    Mock::given(method("GET"))
        .and(path("/annonce/chiens/flaky-3"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_ad(
        &mock_server,
        "/annonce/chiens/flaky-3",
        ad_page("Chiot Boerboel", "200 000 FCFA", Some("Thiès")),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), "unused");
    let result = Coordinator::from_config(&config)
        .unwrap()
        .crawl("Dogs", 1)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.records[0].title(), "Chiot Boerboel");
    assert_eq!(result.records[0].price(), "200 000");
    assert!(result.skipped.is_empty());
}

#[tokio::test]
async fn test_exhausted_ad_is_skipped_and_siblings_survive() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        "1",
        listing_page(&[
            "/annonce/chiens/a-1",
            "/annonce/chiens/broken-2",
            "/annonce/chiens/c-3",
        ]),
    )
    .await;
    mount_ad(&mock_server, "/annonce/chiens/a-1", ad_page("Husky", "300 000 CFA", Some("Dakar"))).await;
    mount_ad(&mock_server, "/annonce/chiens/c-3", ad_page("Labrador", "250 000 CFA", Some("Mbour"))).await;

    Mock::given(method("GET"))
        .and(path("/annonce/chiens/broken-2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused");
    let result = Coordinator::from_config(&config)
        .unwrap()
        .crawl("Dogs", 1)
        .await
        .unwrap();

    let titles: Vec<&str> = result.records.iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Husky", "Labrador"]);

    assert_eq!(result.ads_skipped(), 1);
    match &result.skipped[0] {
        Skipped::Ad { url, .. } => assert!(url.ends_with("/annonce/chiens/broken-2")),
        other => panic!("expected a skipped ad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_category_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused");
    let result = Coordinator::from_config(&config)
        .unwrap()
        .crawl("Cats", 1)
        .await;

    match result {
        Err(HarvestError::InvalidCategory { name, available }) => {
            assert_eq!(name, "Cats");
            assert_eq!(available, vec!["Dogs".to_string()]);
        }
        other => panic!("expected InvalidCategory, got {:?}", other),
    }
}

#[tokio::test]
async fn test_crawl_save_and_reload() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");

    mount_listing(&mock_server, "1", listing_page(&["/annonce/chiens/teckel-9"])).await;
    mount_ad(
        &mock_server,
        "/annonce/chiens/teckel-9",
        ad_page("Teckel", "Prix sur demande", Some("Saint-Louis")),
    )
    .await;

    // Configuration goes through the TOML loader like the CLI does
    let config_path = temp_dir.path().join("harvest.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[crawler]
page-delay-ms = 0

[retry]
backoff-ms = 0

[output]
data-dir = "{}"

[[category]]
name = "Dogs"
url = "{}{}"
"#,
            data_dir.display(),
            mock_server.uri(),
            CATEGORY_PATH
        ),
    )
    .unwrap();
    let config = load_config(&config_path).expect("Failed to load config");

    let coordinator = Coordinator::from_config(&config).unwrap();
    let result = coordinator.crawl("Dogs", 1).await.unwrap();
    assert_eq!(result.len(), 1);

    let category = coordinator.catalog().get("Dogs").unwrap();
    let saved = save_dataset(&result.records, category, &config.output).unwrap();
    assert!(saved
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("coinafrique_chiens_"));

    let catalog = CategoryCatalog::from_config(&config).unwrap();
    let rows = load_dataset(&data_dir, &catalog).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Dogs");
    assert_eq!(rows[0].record, result.records[0]);
}
