//! Observability entrypoints for services embedding the close core.

pub mod tracing;

pub use tracing::{init, init_with_default};
