//! Request entry for the input stream.

mod prompt;

pub use prompt::{submit_request, RequestPrompt};
