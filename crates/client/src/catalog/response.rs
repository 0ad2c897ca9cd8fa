//! Catalog search response types.

use serde::Deserialize;

/// Raw response from the catalog search endpoint.
///
/// The endpoint sends both `numFound` and `num_found`; only the first is read.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<CatalogDoc>,
}

/// One work returned by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDoc {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    /// Numeric cover id.
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub isbn: Vec<String>,
}

impl CatalogResponse {
    /// Cover id of the first doc that has one.
    pub fn first_cover_id(&self) -> Option<i64> {
        self.docs.iter().find_map(|d| d.cover_i.filter(|id| *id > 0))
    }

    /// Distinct ISBNs in doc order, at most `max`.
    pub fn isbns(&self, max: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for isbn in self.docs.iter().flat_map(|d| d.isbn.iter()) {
            let cleaned: String = isbn.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            if out.len() >= max {
                break;
            }
            if cleaned.is_empty() || out.contains(&cleaned) {
                continue;
            }
            out.push(cleaned);
        }
        out
    }
}
