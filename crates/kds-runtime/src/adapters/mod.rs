//! Port implementations used by the runtime.

pub mod notifier;
pub mod pos_backend;

pub use notifier::LogNotifier;
pub use pos_backend::InMemoryPosBackend;
