//! Record stream port and stream trigger events.

mod event;
mod publisher;

pub use event::{StreamEvent, StreamPayload, StreamRecord};
pub use publisher::{InMemoryStreamPublisher, PublishedRecord, StreamPublisher};
