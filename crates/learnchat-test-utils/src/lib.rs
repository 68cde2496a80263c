//! Test helpers shared across learnchat crates.

pub mod catalog;
pub mod events;
pub mod store;
pub mod transport;

pub use catalog::{FailingCatalog, PanickingCatalog, StubCatalog};
pub use events::RecordingEventSink;
pub use store::FailingStore;
pub use transport::ScriptedTransport;
