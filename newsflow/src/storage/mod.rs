//! Object storage port, trigger events, and key naming.

mod event;
mod keys;
mod object;

pub use event::{ObjectCreatedEvent, ObjectRef};
pub use keys::{timestamped_key, SEARCH_TERMS_SUFFIX, TRANSFORMED_CONTENT_SUFFIX};
pub use object::{InMemoryObjectStore, ObjectStore, StoreError};
