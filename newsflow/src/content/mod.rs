//! Content API access: query building, fetching, and serialization.

mod config;
mod fetcher;
mod models;
mod query;
mod serializer;

pub use config::{ContentApiConfig, ItemFailurePolicy};
pub use fetcher::{ContentFetcher, FetchReport, ItemFailure};
pub use models::{truncate_chars, ArticleSummary, ResultSet, SearchResultItem};
pub use query::{build_article_query, build_query, QueryUrl};
pub use serializer::serialize;
