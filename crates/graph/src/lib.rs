//! `closekit-graph` — close-task dependency graph, resolver and progress.
//!
//! Everything in this crate is a pure function over an immutable snapshot of
//! task nodes. No IO, no shared state, no mutation of inputs.

pub mod progress;
pub mod resolver;
pub mod task;

pub use progress::{ProgressSummary, compute_progress, is_close_complete};
pub use resolver::{Resolution, ResolveOptions, resolve};
pub use task::{CloseTaskNode, TaskCategory, TaskGraph, TaskStatus};
