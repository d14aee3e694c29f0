//! Cooperative cancellation for invocations.

mod token;

pub use token::CancellationToken;
