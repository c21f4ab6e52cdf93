//! `closekit-core` — domain foundation for period-end close orchestration.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod period;

pub use error::{DomainError, DomainResult};
pub use id::{CloseRunId, CompanyId, JournalId, LedgerId, TaskId, UserId};
pub use period::ClosePeriod;
