//! The search request handed from the input tool to the transformation stage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{NewsflowError, Result};

/// Search term used when the user enters nothing.
pub const DEFAULT_SEARCH_TERM: &str = "machine learning";
/// Start date used when the user enters nothing.
pub const DEFAULT_DATE_FROM: &str = "2021-01-01";
/// Reference used when the user enters nothing.
pub const DEFAULT_REFERENCE: &str = "guardian_content";

/// Date format accepted for `date_from`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A user search request.
///
/// `reference` is carried through the pipeline untouched. The query builder
/// does not read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text search term, inserted verbatim into the query.
    pub search_term: String,
    /// Earliest publication date, `YYYY-MM-DD`.
    pub date_from: String,
    /// Caller-chosen label for the search.
    #[serde(default)]
    pub reference: String,
}

impl SearchRequest {
    /// Creates a new search request.
    #[must_use]
    pub fn new(
        search_term: impl Into<String>,
        date_from: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            date_from: date_from.into(),
            reference: reference.into(),
        }
    }

    /// Decodes a request from a raw JSON blob.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| NewsflowError::InvalidRequest(e.to_string()))
    }

    /// Encodes the request as compact JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| NewsflowError::Serialization(e.to_string()))
    }

    /// Parses `date_from` as a calendar date.
    pub fn parsed_date_from(&self) -> Result<NaiveDate> {
        parse_date(&self.date_from)
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TERM, DEFAULT_DATE_FROM, DEFAULT_REFERENCE)
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        NewsflowError::InvalidRequest(format!("invalid date '{value}', expected YYYY-MM-DD: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_request() {
        let raw = br#"{"search_term": "machine learning", "date_from": "2023-01-01", "reference": "x"}"#;
        let request = SearchRequest::from_json_bytes(raw).unwrap();

        assert_eq!(request.search_term, "machine learning");
        assert_eq!(request.date_from, "2023-01-01");
        assert_eq!(request.reference, "x");
    }

    #[test]
    fn test_reference_is_optional_on_decode() {
        let raw = br#"{"search_term": "computers", "date_from": "2999-01-01"}"#;
        let request = SearchRequest::from_json_bytes(raw).unwrap();
        assert_eq!(request.reference, "");
    }

    #[test]
    fn test_decode_rejects_missing_term() {
        let err = SearchRequest::from_json_bytes(br#"{"date_from": "2023-01-01"}"#).unwrap_err();
        assert_eq!(err.error_type(), "InvalidRequest");
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = SearchRequest::from_json_bytes(b"not json").unwrap_err();
        assert!(matches!(err, NewsflowError::InvalidRequest(_)));
    }

    #[test]
    fn test_encode_keeps_field_names() {
        let bytes = SearchRequest::default().to_json_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["search_term"], "machine learning");
        assert_eq!(value["date_from"], "2021-01-01");
        assert_eq!(value["reference"], "guardian_content");
    }

    #[test]
    fn test_parse_date() {
        let request = SearchRequest::new("rust", "2023-02-28", "r");
        assert_eq!(
            request.parsed_date_from().unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );

        assert!(parse_date("2023-02-30").is_err());
        assert!(parse_date("01/02/2023").is_err());
        assert!(parse_date("").is_err());
    }
}
