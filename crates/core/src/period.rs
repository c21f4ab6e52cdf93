//! Close period value type.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::LedgerId;

/// One fiscal period of one ledger — the unit a close run operates on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClosePeriod {
    pub ledger_id: LedgerId,
    pub fiscal_year: i32,
    pub period_number: u8,
}

impl ClosePeriod {
    /// Build a period, rejecting out-of-range period numbers.
    ///
    /// Period 13 is allowed for year-end adjustment periods.
    pub fn new(ledger_id: LedgerId, fiscal_year: i32, period_number: u8) -> DomainResult<Self> {
        if period_number == 0 || period_number > 13 {
            return Err(DomainError::validation(format!(
                "period number must be 1..=13, got {period_number}"
            )));
        }
        Ok(Self {
            ledger_id,
            fiscal_year,
            period_number,
        })
    }

    /// Stable display key, e.g. `2026-P03`.
    pub fn period_key(&self) -> String {
        format!("{}-P{:02}", self.fiscal_year, self.period_number)
    }
}
