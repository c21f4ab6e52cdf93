//! Domain intents and the sink they are delivered to.
//!
//! An intent is a serialized, idempotent description of a state change to be
//! applied by an external executor. Delivery is at-least-once: the executor
//! must treat redelivery of the same idempotency key as a no-op, which is why
//! the key is a stable hash (UUIDv5) of the intent's identifying fields and
//! never a fresh random value.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use closekit_core::{CloseRunId, CompanyId, JournalId, LedgerId, TaskId};

/// Namespace for intent idempotency keys (UUIDv5).
const INTENT_NAMESPACE: Uuid = Uuid::from_u128(0x7c1f_a3d4_9e52_4b08_b6de_31c0_58a7_f219);

/// Payload of one close intent, tagged with its stable dotted type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum IntentPayload {
    #[serde(rename = "close.task.complete")]
    TaskComplete {
        run_id: CloseRunId,
        task_id: TaskId,
        evidence_ref: Option<String>,
    },
    #[serde(rename = "close.run.finalize")]
    RunFinalize {
        run_id: CloseRunId,
        period_key: String,
        company_id: CompanyId,
        task_count: usize,
    },
    #[serde(rename = "close.adjustment.post")]
    AdjustmentPost {
        run_id: CloseRunId,
        journal_id: JournalId,
        adjustment_type: String,
    },
    #[serde(rename = "close.lock.hard")]
    HardLock {
        run_id: CloseRunId,
        period_key: String,
        company_id: CompanyId,
        ledger_id: LedgerId,
    },
}

impl IntentPayload {
    /// Stable intent type name (e.g. "close.task.complete").
    pub fn intent_type(&self) -> &'static str {
        match self {
            IntentPayload::TaskComplete { .. } => "close.task.complete",
            IntentPayload::RunFinalize { .. } => "close.run.finalize",
            IntentPayload::AdjustmentPost { .. } => "close.adjustment.post",
            IntentPayload::HardLock { .. } => "close.lock.hard",
        }
    }

    /// Canonical identity string hashed into the idempotency key.
    ///
    /// Only identifying fields participate; derived fields (task counts,
    /// period keys already implied by the run) are excluded so that the same
    /// logical operation always hashes to the same key.
    fn identity(&self) -> String {
        match self {
            IntentPayload::TaskComplete {
                run_id,
                task_id,
                evidence_ref,
            } => format!(
                "close.task.complete:{run_id}:{task_id}:{}",
                evidence_ref.as_deref().unwrap_or("-")
            ),
            IntentPayload::RunFinalize { run_id, .. } => {
                format!("close.run.finalize:{run_id}")
            }
            IntentPayload::AdjustmentPost {
                run_id,
                journal_id,
                adjustment_type,
            } => format!("close.adjustment.post:{run_id}:{journal_id}:{adjustment_type}"),
            IntentPayload::HardLock { run_id, .. } => {
                format!("close.lock.hard:{run_id}")
            }
        }
    }
}

/// Envelope handed to the intent sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainIntent {
    #[serde(flatten)]
    pub payload: IntentPayload,
    pub idempotency_key: Uuid,
}

impl DomainIntent {
    pub fn new(payload: IntentPayload) -> Self {
        let idempotency_key = Uuid::new_v5(&INTENT_NAMESPACE, payload.identity().as_bytes());
        Self {
            payload,
            idempotency_key,
        }
    }

    pub fn intent_type(&self) -> &'static str {
        self.payload.intent_type()
    }
}

/// Consumer of approved intents (the external executor boundary).
///
/// Implementations own durability, retries and concurrency control; this
/// core only decides and emits.
pub trait IntentSink: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn deliver(&self, intent: DomainIntent) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub enum InMemorySinkError {
    /// Delivery failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory sink for tests/dev. Records every delivered intent in order.
#[derive(Debug, Default)]
pub struct InMemoryIntentSink {
    delivered: Mutex<Vec<DomainIntent>>,
}

impl InMemoryIntentSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<DomainIntent> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl IntentSink for InMemoryIntentSink {
    type Error = InMemorySinkError;

    fn deliver(&self, intent: DomainIntent) -> Result<(), Self::Error> {
        let mut delivered = self
            .delivered
            .lock()
            .map_err(|_| InMemorySinkError::Poisoned)?;
        delivered.push(intent);
        Ok(())
    }
}
