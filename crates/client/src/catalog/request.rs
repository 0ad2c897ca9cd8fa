//! Catalog search query shapes and validation.

use coverfind_core::Error;

/// Fields requested when only a cover id is needed.
pub const COVER_FIELDS: &str = "key,title,author_name,cover_i";

/// Fields requested for the ISBN-assisted lookup.
pub const ISBN_FIELDS: &str = "key,title,cover_i,isbn";

/// One search against the catalog (`?q=&limit=&fields=`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Search query (required, max 400 chars).
    pub q: String,

    /// Number of docs to return (1-100).
    pub limit: u8,

    /// Comma-separated field list.
    pub fields: &'static str,
}

/// Quotes would end the phrase early inside `title:"..."`.
fn phrase(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

impl CatalogQuery {
    /// `title:"<title>" author:"<author>"`
    pub fn title_author(title: &str, author: &str) -> Self {
        Self { q: format!("title:\"{}\" author:\"{}\"", phrase(title), phrase(author)), limit: 5, fields: COVER_FIELDS }
    }

    /// `title:"<title>"`
    pub fn title(title: &str) -> Self {
        Self { q: format!("title:\"{}\"", phrase(title)), limit: 5, fields: COVER_FIELDS }
    }

    /// Title+author when an author is known, title alone otherwise.
    pub fn title_maybe_author(title: &str, author: Option<&str>) -> Self {
        match author {
            Some(author) => Self::title_author(title, author),
            None => Self::title(title),
        }
    }

    /// Unstructured keyword search.
    pub fn keywords(text: &str) -> Self {
        Self { q: phrase(text), limit: 5, fields: COVER_FIELDS }
    }

    /// Every book by `author`, wide limit.
    pub fn author(author: &str) -> Self {
        Self { q: format!("author:\"{}\"", phrase(author)), limit: 50, fields: COVER_FIELDS }
    }

    pub fn with_fields(mut self, fields: &'static str) -> Self {
        self.fields = fields;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.q.trim().is_empty() {
            return Err(Error::InvalidInput("catalog query cannot be empty".to_string()));
        }

        if self.q.len() > 400 {
            return Err(Error::InvalidInput(format!("catalog query too long: {} chars (max 400)", self.q.len())));
        }

        if !(1..=100).contains(&self.limit) {
            return Err(Error::InvalidInput(format!("catalog limit out of range: {}", self.limit)));
        }

        Ok(())
    }

    /// Full request URL against `endpoint`.
    pub fn to_url(&self, endpoint: &str) -> Result<String, Error> {
        let limit = self.limit.to_string();
        let url = url::Url::parse_with_params(
            endpoint,
            &[("q", self.q.as_str()), ("limit", limit.as_str()), ("fields", self.fields)],
        )
        .map_err(|e| Error::InvalidUrl(format!("{endpoint}: {e}")))?;
        Ok(url.into())
    }
}
