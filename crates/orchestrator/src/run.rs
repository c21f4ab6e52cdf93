//! Close run: one execution of the close for a period.

use serde::{Deserialize, Serialize};

use closekit_core::{ClosePeriod, CloseRunId, CompanyId};

/// Run lifecycle: `Open → Finalized → HardLocked`.
///
/// Transitions are decided by the orchestrator but applied by the external
/// executor; the caller carries the current state on the [`CloseRun`] value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseRunState {
    Open,
    Finalized,
    HardLocked,
}

/// A close run created externally; this core only decides whether its
/// transitions are legal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseRun {
    pub id: CloseRunId,
    pub company_id: CompanyId,
    pub period: ClosePeriod,
    pub state: CloseRunState,
}

impl CloseRun {
    pub fn open(id: CloseRunId, company_id: CompanyId, period: ClosePeriod) -> Self {
        Self {
            id,
            company_id,
            period,
            state: CloseRunState::Open,
        }
    }

    pub fn with_state(self, state: CloseRunState) -> Self {
        Self { state, ..self }
    }
}
