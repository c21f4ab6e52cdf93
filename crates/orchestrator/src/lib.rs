//! `closekit-orchestrator` — the close-run state machine.
//!
//! Composes the graph resolver, progress tracker and evidence validator into
//! the service-level decision layer: ready/blocked checklists, task-completion
//! preconditions, finalize/hard-lock gating and close-pack generation.
//!
//! The orchestrator never persists anything itself. Reads go through a
//! [`ChecklistReadModel`]; approved writes leave as [`DomainIntent`] values
//! for an external, transactional executor (decide vs. execute).

pub mod intent;
pub mod orchestrator;
pub mod read_model;
pub mod run;

pub use intent::{DomainIntent, InMemoryIntentSink, IntentPayload, IntentSink};
pub use orchestrator::{
    Checklist, ClosePack, CloseStatus, CloseOrchestrator, OrchestratorError, TaskArtifact,
};
pub use read_model::{ChecklistReadModel, InMemoryReadModel, TaskRow};
pub use run::{CloseRun, CloseRunState};
