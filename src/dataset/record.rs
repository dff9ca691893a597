use serde::{Deserialize, Serialize};
use std::fmt;

/// Text written in place of a field the ad page did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// One extracted listing
///
/// Internally an absent field is `None`, so a listing whose title literally
/// reads "N/A" stays distinguishable from a listing without a title. The
/// sentinel only appears at the boundary: the `*()` accessors, `Display` and
/// serialization all render `None` as [`NOT_AVAILABLE`].
///
/// Deserialization also accepts the French column names (`Nom`, `prix`,
/// `adresse`, `image_lien`) of datasets exported by the Web Scraper extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdRecord {
    #[serde(default, with = "sentinel", alias = "Nom")]
    pub title: Option<String>,

    /// Price as displayed, currency marker removed
    #[serde(default, with = "sentinel", alias = "prix")]
    pub price: Option<String>,

    #[serde(default, with = "sentinel", alias = "adresse")]
    pub address: Option<String>,

    /// Absolute or relative URL of the first slide image
    #[serde(default, with = "sentinel", alias = "image_lien")]
    pub image_url: Option<String>,
}

impl AdRecord {
    pub fn title(&self) -> &str {
        or_sentinel(&self.title)
    }

    pub fn price(&self) -> &str {
        or_sentinel(&self.price)
    }

    pub fn address(&self) -> &str {
        or_sentinel(&self.address)
    }

    pub fn image_url(&self) -> &str {
        or_sentinel(&self.image_url)
    }

    /// Returns true when no field could be extracted at all
    pub fn is_blank(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.address.is_none()
            && self.image_url.is_none()
    }
}

impl fmt::Display for AdRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.title(),
            self.price(),
            self.address(),
            self.image_url()
        )
    }
}

fn or_sentinel(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Serde adapter mapping `None` to and from the "N/A" sentinel
mod sentinel {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(field: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(field.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != NOT_AVAILABLE))
    }
}
