//! Core domain model types for newsflow.
//!
//! This module contains the types shared by every stage:
//! - The search request read from the ingested bucket
//! - The invocation state machine
//! - The per-invocation report

mod report;
mod request;
mod status;

pub use report::InvocationReport;
pub use request::{
    parse_date, SearchRequest, DATE_FORMAT, DEFAULT_DATE_FROM, DEFAULT_REFERENCE,
    DEFAULT_SEARCH_TERM,
};
pub use status::InvocationState;
