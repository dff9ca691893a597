use ::url::Url;

/// Builds the URL of one listing page
///
/// The page number is appended as a query parameter, keeping any query the
/// category URL already carries.
///
/// # Example
///
/// ```
/// use ad_harvest::url::page_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/categorie/chiens").unwrap();
/// assert_eq!(
///     page_url(&base, "page", 2).as_str(),
///     "https://example.com/categorie/chiens?page=2"
/// );
/// ```
pub fn page_url(base_url: &Url, page_param: &str, page_index: u32) -> Url {
    let mut url = base_url.clone();
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair(page_param, &page_index.to_string());
    url
}

/// Returns the `scheme://host[:port]` part of a URL
pub fn site_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Resolves an ad href to an absolute URL
///
/// # Resolution Rules
///
/// | href | result |
/// |------|--------|
/// | `http://…` / `https://…` | used as-is |
/// | `/ads/123` (root-relative) | site origin + href |
/// | `ads/123` (anything else) | category base URL + `/` + href |
///
/// The last rule deliberately treats the category URL as a directory, so
/// `ads/123` found under `https://example.com/categorie/chiens` resolves to
/// `https://example.com/categorie/chiens/ads/123`.
///
/// Returns None for empty hrefs and hrefs that do not produce a valid HTTP(S) URL.
pub fn resolve_href(base_url: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(_) if href.starts_with('/') => {
            Url::parse(&format!("{}{}", site_origin(base_url), href)).ok()?
        }
        Err(_) => {
            let mut directory = base_url.clone();
            directory.set_query(None);
            directory.set_fragment(None);
            let joined = format!("{}/{}", directory.as_str().trim_end_matches('/'), href);
            Url::parse(&joined).ok()?
        }
    };

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Some(resolved)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/categorie/chiens").unwrap()
    }

    #[test]
    fn test_root_relative_href() {
        let resolved = resolve_href(&base_url(), "/ads/123").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/ads/123");
    }

    #[test]
    fn test_absolute_href_unchanged() {
        let resolved = resolve_href(&base_url(), "https://other.com/x").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_relative_href_under_category() {
        let resolved = resolve_href(&base_url(), "ads/123").unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://example.com/categorie/chiens/ads/123"
        );
    }

    #[test]
    fn test_relative_href_with_trailing_slash_base() {
        let base = Url::parse("https://example.com/categorie/chiens/").unwrap();
        let resolved = resolve_href(&base, "ads/123").unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://example.com/categorie/chiens/ads/123"
        );
    }

    #[test]
    fn test_root_relative_keeps_port() {
        let base = Url::parse("http://127.0.0.1:8080/categorie/chiens").unwrap();
        let resolved = resolve_href(&base, "/ads/1").unwrap();
        assert_eq!(resolved.as_str(), "http://127.0.0.1:8080/ads/1");
    }

    #[test]
    fn test_empty_and_non_http_hrefs() {
        assert!(resolve_href(&base_url(), "   ").is_none());
        assert!(resolve_href(&base_url(), "mailto:someone@example.com").is_none());
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            page_url(&base_url(), "page", 1).as_str(),
            "https://example.com/categorie/chiens?page=1"
        );

        let with_query = Url::parse("https://example.com/search?q=chien").unwrap();
        assert_eq!(
            page_url(&with_query, "page", 3).as_str(),
            "https://example.com/search?q=chien&page=3"
        );
    }

    #[test]
    fn test_site_origin() {
        assert_eq!(site_origin(&base_url()), "https://example.com");
    }
}
