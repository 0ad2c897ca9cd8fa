//! Request and result records exchanged with callers of the cover pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A book to find a cover for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoverRequest {
    /// Book title as entered by the user or import.
    pub title: String,
    /// Authors in credit order; may be empty.
    #[serde(default)]
    pub authors: Vec<String>,
}

impl CoverRequest {
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self { title: title.into(), authors }
    }

    /// The first credited author, if any non-blank one exists.
    pub fn primary_author(&self) -> Option<&str> {
        self.authors
            .first()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
    }
}

/// Outcome of a cover lookup.
///
/// `cover_url` set means a source matched; `local_path` set means the image
/// was also stored. Neither set is the ordinary "not found" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverResult {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Public path of the stored file (`/covers/<filename>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl CoverResult {
    /// A bare result carrying only the request fields.
    pub fn empty(request: &CoverRequest) -> Self {
        Self { title: request.title.clone(), authors: request.authors.clone(), cover_url: None, local_path: None }
    }

    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    pub fn with_local_path(mut self, path: impl Into<String>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    pub fn is_found(&self) -> bool {
        self.cover_url.is_some()
    }

    pub fn is_stored(&self) -> bool {
        self.local_path.is_some()
    }

    /// The request this result answers.
    pub fn request(&self) -> CoverRequest {
        CoverRequest { title: self.title.clone(), authors: self.authors.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_author() {
        let req = CoverRequest::new("1984", vec!["George Orwell".into(), "Someone Else".into()]);
        assert_eq!(req.primary_author(), Some("George Orwell"));

        let req = CoverRequest::new("Anonymous", vec![]);
        assert_eq!(req.primary_author(), None);

        let req = CoverRequest::new("Blank", vec!["   ".into()]);
        assert_eq!(req.primary_author(), None);
    }

    #[test]
    fn test_empty_result_has_request_fields_only() {
        let req = CoverRequest::new("Dune", vec!["Frank Herbert".into()]);
        let result = CoverResult::empty(&req);
        assert_eq!(result.title, "Dune");
        assert_eq!(result.authors, vec!["Frank Herbert".to_string()]);
        assert!(!result.is_found());
        assert!(!result.is_stored());
        assert_eq!(result.request(), req);
    }

    #[test]
    fn test_serialized_shape() {
        let req = CoverRequest::new("1984", vec!["George Orwell".into()]);
        let result = CoverResult::empty(&req)
            .with_cover_url("https://covers.example/1-M.jpg")
            .with_local_path("/covers/1984_by_george_orwell.jpg");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["coverUrl"], "https://covers.example/1-M.jpg");
        assert_eq!(json["localPath"], "/covers/1984_by_george_orwell.jpg");

        let bare = serde_json::to_value(CoverResult::empty(&req)).unwrap();
        assert!(bare.get("coverUrl").is_none());
        assert!(bare.get("localPath").is_none());
    }

    #[test]
    fn test_request_authors_default() {
        let req: CoverRequest = serde_json::from_str(r#"{"title": "Beowulf"}"#).unwrap();
        assert!(req.authors.is_empty());
    }
}
