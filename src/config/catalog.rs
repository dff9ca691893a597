//! Category catalog
//!
//! The catalog is the fixed mapping from category display name to the base
//! listing URL of that category. It is built once at startup and only read
//! afterwards.

use crate::config::types::{CategoryEntry, Config};
use crate::ConfigError;
use url::Url;

/// Category label for dataset files whose name matches no catalog entry
pub const UNCATEGORIZED: &str = "Uncategorized";

const BUILTIN_CATEGORIES: &[(&str, &str)] = &[
    ("Dogs", "https://sn.coinafrique.com/categorie/chiens"),
    ("Sheep", "https://sn.coinafrique.com/categorie/moutons"),
    (
        "Poultry/Rabbits/Pigeons",
        "https://sn.coinafrique.com/categorie/poules-lapins-et-pigeons",
    ),
    ("Other", "https://sn.coinafrique.com/categorie/autres-animaux"),
];

/// A single marketplace category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    base_url: Url,
    slug: String,
}

impl Category {
    /// Creates a category, deriving the slug from the URL when none is given
    pub fn new(name: &str, url: &str, slug: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid category URL '{}': {}", url, e)))?;

        let slug = match slug {
            Some(s) => s.to_string(),
            None => base_url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .map(str::to_string)
                .ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "Cannot derive a slug for category '{}' from '{}'",
                        name, url
                    ))
                })?,
        };

        Ok(Self {
            name: name.to_string(),
            base_url,
            slug,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Keyword identifying this category inside a dataset file name
    ///
    /// This is the first word of the slug in singular form, so
    /// `poules-lapins-et-pigeons` yields `poule` and `chiens` yields `chien`.
    pub fn file_keyword(&self) -> String {
        let head = self.slug.split('-').next().unwrap_or(&self.slug);
        let singular = head.strip_suffix('s').unwrap_or(head);
        singular.to_lowercase()
    }
}

/// Read-only mapping from category name to base listing URL
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// The four animal categories of the marketplace
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .filter_map(|(name, url)| Category::new(name, url, None).ok())
            .collect();
        Self { categories }
    }

    /// Builds the catalog from configuration, falling back to the built-in one
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.categories.is_empty() {
            return Ok(Self::builtin());
        }
        Self::from_entries(&config.categories)
    }

    /// Builds a catalog from explicit entries
    pub fn from_entries(entries: &[CategoryEntry]) -> Result<Self, ConfigError> {
        let categories = entries
            .iter()
            .map(|entry| Category::new(&entry.name, &entry.url, entry.slug.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { categories })
    }

    /// Looks up a category by display name or slug, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&Category> {
        let wanted = name.trim();
        self.categories.iter().find(|c| c.name == wanted).or_else(|| {
            self.categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(wanted) || c.slug.eq_ignore_ascii_case(wanted))
        })
    }

    /// Display names, in catalog order
    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Recovers the category a dataset file belongs to from its file name
    ///
    /// The exact slug wins over the looser keyword match; files matching
    /// nothing are labelled [`UNCATEGORIZED`].
    pub fn category_from_file_name(&self, file_name: &str) -> &str {
        let lower = file_name.to_lowercase();

        if let Some(category) = self
            .categories
            .iter()
            .find(|c| lower.contains(&c.slug.to_lowercase()))
        {
            return &category.name;
        }

        self.categories
            .iter()
            .find(|c| {
                let keyword = c.file_keyword();
                !keyword.is_empty() && lower.contains(&keyword)
            })
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }
}
