//! # Execution Ledger
//!
//! The replay substrate: a record of every completed side-effecting call,
//! keyed by stable call identity. The engine's contract with the ledger is
//! simple — do not re-issue a call whose outcome is already recorded; treat
//! a call with no recorded outcome as not yet attempted. Only successful
//! outcomes are ever recorded, so an interrupted run resumes by re-issuing
//! exactly its unfinished calls.
//!
//! The ledger is an injected capability, never a hidden global. The
//! in-memory implementation here backs tests and single-process embeddings;
//! durable backends implement the same trait outside this crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::errors::ActivityError;

/// One recorded call outcome.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub value: Value,
    pub recorded_at: DateTime<Utc>,
}

/// Durable record of completed call outcomes, keyed by call id.
#[async_trait]
pub trait ExecutionLedger: Send + Sync {
    /// Record the outcome of a completed call. Recording the same call id
    /// twice keeps the first outcome; replays must never overwrite history.
    async fn record(&self, call_id: &str, value: Value) -> Result<(), ActivityError>;

    /// Fetch the recorded outcome for a call id, if the call completed.
    async fn recorded(&self, call_id: &str) -> Result<Option<LedgerEntry>, ActivityError>;
}

/// In-memory ledger for tests and single-process use.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: DashMap<String, LedgerEntry>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every recorded outcome. Test helper for simulating a fresh
    /// notification rather than a resumed one.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl ExecutionLedger for InMemoryLedger {
    async fn record(&self, call_id: &str, value: Value) -> Result<(), ActivityError> {
        self.entries
            .entry(call_id.to_string())
            .or_insert_with(|| LedgerEntry {
                value,
                recorded_at: Utc::now(),
            });
        Ok(())
    }

    async fn recorded(&self, call_id: &str) -> Result<Option<LedgerEntry>, ActivityError> {
        Ok(self.entries.get(call_id).map(|e| e.value().clone()))
    }
}

/// Serialize an outcome for recording.
pub(crate) fn encode_outcome<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Deserialize a previously recorded outcome.
pub(crate) fn decode_outcome<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recipient, RecipientsInfo};
    use serde_json::json;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_unrecorded_call_is_not_yet_attempted() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.recorded("n1/all_users").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_then_fetch() {
        let ledger = InMemoryLedger::new();
        assert_ok!(ledger.record("n1/all_users", json!({"ok": true})).await);

        let entry = ledger.recorded("n1/all_users").await.unwrap().unwrap();
        assert_eq!(entry.value, json!({"ok": true}));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_first_recorded_outcome_wins() {
        let ledger = InMemoryLedger::new();
        ledger.record("c", json!(1)).await.unwrap();
        ledger.record("c", json!(2)).await.unwrap();

        let entry = ledger.recorded("c").await.unwrap().unwrap();
        assert_eq!(entry.value, json!(1));
    }

    #[tokio::test]
    async fn test_typed_outcome_round_trip() {
        let ledger = InMemoryLedger::new();
        let info: RecipientsInfo = [Recipient::new("u1"), Recipient::new("u2")]
            .into_iter()
            .collect();

        ledger
            .record("n1/team_roster/1/T1", encode_outcome(&info).unwrap())
            .await
            .unwrap();

        let entry = ledger.recorded("n1/team_roster/1/T1").await.unwrap().unwrap();
        let back: RecipientsInfo = decode_outcome(entry.value).unwrap();
        assert_eq!(back, info);
    }
}
