//! Data models for content API responses and the published result set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope of a search API response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchEnvelope {
    pub response: SearchResponse,
}

/// Body of a search API response.
///
/// Items are kept as raw values so each one can be decoded on its own and a
/// failure can be attributed to its position.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    pub results: Vec<serde_json::Value>,
}

/// One search result item, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResultItem {
    /// Publication timestamp as sent by the API.
    #[serde(rename = "webPublicationDate")]
    pub publication_date: String,
    /// Article headline.
    #[serde(rename = "webTitle")]
    pub title: String,
    /// Canonical public URL.
    #[serde(rename = "webUrl")]
    pub url: String,
    /// API URL used for the body fetch.
    #[serde(rename = "apiUrl")]
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArticleEnvelope {
    pub response: ArticleResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArticleResponse {
    pub content: ArticleContent,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArticleContent {
    pub fields: ArticleFields,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArticleFields {
    pub body: String,
}

/// An enriched search result.
///
/// Serialized with the content API's own field names so downstream readers
/// see the same keys the API uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Publication timestamp as sent by the API.
    #[serde(rename = "webPublicationDate")]
    pub publication_date: String,
    /// Article headline.
    #[serde(rename = "webTitle")]
    pub title: String,
    /// Canonical public URL.
    #[serde(rename = "webUrl")]
    pub url: String,
    /// Leading characters of the article body.
    pub content_preview: String,
}

impl ArticleSummary {
    /// Builds a summary from a search item and the fetched body.
    #[must_use]
    pub fn from_item(item: SearchResultItem, body: &str, preview_chars: usize) -> Self {
        Self {
            publication_date: item.publication_date,
            title: item.title,
            url: item.url,
            content_preview: truncate_chars(body, preview_chars),
        }
    }
}

/// Returns the first `max_chars` characters of `text`.
///
/// Counts `char`s, not bytes, so multi-byte characters are never split.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Enriched results keyed by 1-based position, wrapped as `{"content": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    content: BTreeMap<usize, ArticleSummary>,
}

impl ResultSet {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbers `articles` `1..=N` in iteration order.
    #[must_use]
    pub fn from_articles(articles: impl IntoIterator<Item = ArticleSummary>) -> Self {
        let mut set = Self::new();
        for article in articles {
            set.push(article);
        }
        set
    }

    /// Appends an article and returns its index.
    pub fn push(&mut self, article: ArticleSummary) -> usize {
        let index = self.content.len() + 1;
        self.content.insert(index, article);
        index
    }

    /// Returns the article at a 1-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArticleSummary> {
        self.content.get(&index)
    }

    /// Number of articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if there are no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterates `(index, article)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ArticleSummary)> {
        self.content.iter().map(|(i, a)| (*i, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> ArticleSummary {
        ArticleSummary {
            publication_date: "2023-11-21T11:11:31Z".to_string(),
            title: title.to_string(),
            url: format!("https://www.theguardian.com/{title}"),
            content_preview: String::new(),
        }
    }

    #[test]
    fn test_truncate_chars_short_text_unchanged() {
        assert_eq!(truncate_chars("hello", 1000), "hello");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_truncate_chars_exact_boundary() {
        let text = "a".repeat(1500);
        let preview = truncate_chars(&text, 1000);
        assert_eq!(preview.chars().count(), 1000);
        assert_eq!(truncate_chars(&"b".repeat(1000), 1000).len(), 1000);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let text = "é–😀".repeat(500);
        let preview = truncate_chars(&text, 1000);

        assert_eq!(preview.chars().count(), 1000);
        assert!(text.starts_with(&preview));
        assert!(preview.len() > 1000);
    }

    #[test]
    fn test_result_set_numbers_in_order() {
        let set = ResultSet::from_articles(vec![article("a"), article("b"), article("c")]);

        assert_eq!(set.len(), 3);
        let titles: Vec<_> = set.iter().map(|(i, a)| (i, a.title.as_str())).collect();
        assert_eq!(titles, vec![(1, "a"), (2, "b"), (3, "c")]);
        assert!(set.get(0).is_none());
        assert!(set.get(4).is_none());
    }

    #[test]
    fn test_search_item_decodes_wire_names() {
        let item: SearchResultItem = serde_json::from_value(serde_json::json!({
            "id": "info/2023/nov/21/x",
            "webPublicationDate": "2023-11-21T11:11:31Z",
            "webTitle": "Who said what",
            "webUrl": "https://www.theguardian.com/info/x",
            "apiUrl": "https://content.guardianapis.com/info/x"
        }))
        .unwrap();

        assert_eq!(item.title, "Who said what");
        assert_eq!(item.api_url, "https://content.guardianapis.com/info/x");
    }

    #[test]
    fn test_summary_serializes_wire_names() {
        let value = serde_json::to_value(article("a")).unwrap();
        assert!(value.get("webPublicationDate").is_some());
        assert!(value.get("webTitle").is_some());
        assert!(value.get("webUrl").is_some());
        assert!(value.get("content_preview").is_some());
    }
}
