//! `closekit-evidence` — evidence-count readiness checks.
//!
//! A pure, stateless rule evaluator: it only knows whether an observed
//! evidence count clears the required minimum. The mapping from task type to
//! required count is external policy configuration supplied by the caller.

pub mod validator;

pub use validator::{
    EvidenceRequirement, ValidationCheck, ValidationSummary, summarize, validate,
};
