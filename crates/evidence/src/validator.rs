//! Evidence requirement evaluation and aggregation.

use serde::{Deserialize, Serialize};

use closekit_core::TaskId;

/// One task's evidence bar: observed count vs. required minimum.
///
/// Computed per validation request from current evidence records; not
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRequirement {
    pub task_id: TaskId,
    pub task_code: String,
    pub evidence_count: u32,
    pub required_count: u32,
}

/// Outcome of checking one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub check_code: String,
    pub label: String,
    pub passed: bool,
    pub message: String,
}

/// Aggregate over a batch of checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub all_passed: bool,
    pub passed_count: usize,
    pub failed_count: usize,
    pub failures: Vec<ValidationCheck>,
}

/// Evaluate each requirement: passed iff observed count meets the minimum.
pub fn validate(requirements: &[EvidenceRequirement]) -> Vec<ValidationCheck> {
    requirements
        .iter()
        .map(|req| {
            let passed = req.evidence_count >= req.required_count;
            let message = if passed {
                format!(
                    "{}: {} of {} evidence items attached",
                    req.task_code, req.evidence_count, req.required_count
                )
            } else {
                format!(
                    "{}: requires {} evidence items, found {}",
                    req.task_code, req.required_count, req.evidence_count
                )
            };
            ValidationCheck {
                check_code: format!("evidence.{}", req.task_code),
                label: format!("{} evidence", req.task_code),
                passed,
                message,
            }
        })
        .collect()
}

/// Fold checks into a pass/fail summary. An empty batch is vacuously passed.
pub fn summarize(checks: &[ValidationCheck]) -> ValidationSummary {
    let failures: Vec<ValidationCheck> =
        checks.iter().filter(|c| !c.passed).cloned().collect();
    let failed_count = failures.len();
    ValidationSummary {
        all_passed: failed_count == 0,
        passed_count: checks.len() - failed_count,
        failed_count,
        failures,
    }
}
