//! Log subscriber setup.

mod logging;

pub use logging::{init_tracing, invocation_span, LogFormat, DEFAULT_FILTER};
