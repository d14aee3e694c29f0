//! Query URL construction for the content API.

use std::borrow::Cow;
use std::fmt;

use super::config::ContentApiConfig;
use crate::core::SearchRequest;
use crate::credentials::ApiCredential;

/// A fully formed request URL that embeds the API credential.
///
/// `Display` redacts the credential; [`QueryUrl::as_str`] returns the URL to
/// send.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryUrl {
    url: String,
    credential_field: String,
}

impl QueryUrl {
    fn new(url: String, credential_field: &str) -> Self {
        Self {
            url,
            credential_field: credential_field.to_string(),
        }
    }

    /// The URL including the credential.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The URL with the credential value replaced by `***`.
    #[must_use]
    pub fn redacted(&self) -> String {
        redact_credential(&self.url, &self.credential_field)
    }
}

impl fmt::Display for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QueryUrl").field(&self.redacted()).finish()
    }
}

/// Builds the search URL: term, then date filter, then credential.
///
/// Every value is percent-encoded, so a `#` or `&` in the term stays part of
/// `q`. `request.reference` is not used.
#[must_use]
pub fn build_query(
    credential: &ApiCredential,
    request: &SearchRequest,
    config: &ContentApiConfig,
) -> QueryUrl {
    let url = format!(
        "{}?q={}&{}={}&{}={}",
        config.search_endpoint,
        encode(&request.search_term),
        config.date_field,
        encode(&request.date_from),
        config.credential_field,
        encode(credential.expose()),
    );
    QueryUrl::new(url, &config.credential_field)
}

/// Builds the body-fetch URL for one article: options, then credential.
#[must_use]
pub fn build_article_query(
    api_url: &str,
    credential: &ApiCredential,
    config: &ContentApiConfig,
) -> QueryUrl {
    let mut url = String::from(api_url);
    let mut separator = if api_url.contains('?') { '&' } else { '?' };
    for (name, value) in &config.article_options {
        url.push(separator);
        url.push_str(name);
        url.push('=');
        url.push_str(&encode(value));
        separator = '&';
    }
    url.push(separator);
    url.push_str(&config.credential_field);
    url.push('=');
    url.push_str(&encode(credential.expose()));
    QueryUrl::new(url, &config.credential_field)
}

fn encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

fn redact_credential(url: &str, credential_field: &str) -> String {
    let marker = format!("{credential_field}=");
    let Some(start) = url.rfind(&marker).map(|i| i + marker.len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}***{}", &url[..start], &url[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ContentApiConfig {
        ContentApiConfig::default()
    }

    fn query_pairs(url: &QueryUrl) -> Vec<(String, String)> {
        reqwest::Url::parse(url.as_str())
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_build_query_encodes_spaces() {
        let request = SearchRequest::new("machine learning", "2023-01-01", "Guardian_content");
        let url = build_query(&ApiCredential::new("test"), &request, &config());

        assert_eq!(
            url.as_str(),
            "https://content.guardianapis.com/search?q=machine%20learning&from-date=2023-01-01&api-key=test"
        );
    }

    #[test]
    fn test_build_query_order_and_single_occurrence() {
        let request = SearchRequest::new("machine learning", "2023-01-01", "x");
        let url = build_query(&ApiCredential::new("test"), &request, &config());
        let s = url.as_str();

        assert!(s.ends_with("&api-key=test"));
        assert_eq!(s.matches("2023-01-01").count(), 1);
        assert_eq!(s.matches("api-key=").count(), 1);
        assert_eq!(
            query_pairs(&url),
            vec![
                pair("q", "machine learning"),
                pair("from-date", "2023-01-01"),
                pair("api-key", "test"),
            ]
        );
    }

    #[test]
    fn test_build_query_keeps_fragment_and_ampersand_inside_term() {
        let credential = ApiCredential::new("k&ey#1");
        for term in ["C#", "R&D spending", "50% off"] {
            let request = SearchRequest::new(term, "2023-01-01", "x");
            let url = build_query(&credential, &request, &config());

            assert_eq!(reqwest::Url::parse(url.as_str()).unwrap().fragment(), None);
            assert_eq!(
                query_pairs(&url),
                vec![
                    pair("q", term),
                    pair("from-date", "2023-01-01"),
                    pair("api-key", "k&ey#1"),
                ]
            );
        }
    }

    #[test]
    fn test_reference_does_not_change_url() {
        let credential = ApiCredential::new("test");
        let a = build_query(&credential, &SearchRequest::new("computers", "2999-01-01", "Guardian_content"), &config());
        let b = build_query(&credential, &SearchRequest::new("computers", "2999-01-01", "bad_reference"), &config());

        assert_eq!(a, b);
        assert!(!a.as_str().contains("reference"));
    }

    #[test]
    fn test_build_query_is_deterministic() {
        let request = SearchRequest::new("rust", "2024-05-01", "r");
        let credential = ApiCredential::new("k");
        assert_eq!(
            build_query(&credential, &request, &config()).as_str(),
            build_query(&credential, &request, &config()).as_str()
        );
    }

    #[test]
    fn test_build_article_query() {
        let url = build_article_query(
            "https://content.guardianapis.com/info/2023/nov/21/quotes",
            &ApiCredential::new("test"),
            &config(),
        );

        assert_eq!(
            url.as_str(),
            "https://content.guardianapis.com/info/2023/nov/21/quotes?show-elements=all&show-fields=body&api-key=test"
        );
    }

    #[test]
    fn test_build_article_query_with_existing_query_string() {
        let url = build_article_query("http://localhost/a?format=json", &ApiCredential::new("k"), &config());
        assert_eq!(
            url.as_str(),
            "http://localhost/a?format=json&show-elements=all&show-fields=body&api-key=k"
        );
    }

    #[test]
    fn test_build_article_query_encodes_credential() {
        let url = build_article_query("http://localhost/a", &ApiCredential::new("a#b"), &config());
        assert_eq!(
            url.as_str(),
            "http://localhost/a?show-elements=all&show-fields=body&api-key=a%23b"
        );
    }

    #[test]
    fn test_display_redacts_credential() {
        let request = SearchRequest::new("rust", "2024-05-01", "r");
        let url = build_query(&ApiCredential::new("s3cr3t"), &request, &config());

        assert!(url.as_str().contains("s3cr3t"));
        assert!(!url.to_string().contains("s3cr3t"));
        assert!(!format!("{url:?}").contains("s3cr3t"));
        assert!(url.redacted().ends_with("api-key=***"));
    }
}
