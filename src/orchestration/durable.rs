//! # Durable Call Wrapper
//!
//! The replay discipline every side-effecting call goes through: consult
//! the execution ledger first, return a recorded outcome without re-issuing
//! the call, otherwise execute under the shared retry policy and record the
//! success. Failures are never recorded, so a restarted run re-issues
//! exactly the calls that had not completed.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::errors::{ActivityError, SyncError, SyncResult};
use super::ledger::{decode_outcome, encode_outcome, ExecutionLedger};
use super::retry::RetryPolicy;
use super::types::StepId;

/// Replay-aware execution context shared by the engine and the fan-out
/// coordinator.
#[derive(Clone)]
pub(crate) struct DurableContext {
    pub ledger: Arc<dyn ExecutionLedger>,
    pub retry: RetryPolicy,
}

impl DurableContext {
    /// Execute `op` at most once effectively for this step.
    ///
    /// A previously recorded outcome is decoded and returned without
    /// touching the collaborator. A genuinely new call runs under the retry
    /// policy; its outcome is recorded before being returned.
    pub async fn call<T, F, Fut>(
        &self,
        notification_id: &str,
        step: StepId,
        op: F,
    ) -> SyncResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ActivityError>>,
    {
        let call_id = step.call_id(notification_id);

        if let Some(entry) = self
            .ledger
            .recorded(&call_id)
            .await
            .map_err(|e| ledger_fault(&step, e))?
        {
            debug!(call_id = %call_id, recorded_at = %entry.recorded_at, "replaying recorded outcome");
            return decode_outcome(entry.value).map_err(|e| SyncError::Ledger {
                step,
                message: format!("failed to decode recorded outcome: {e}"),
            });
        }

        let value = self.retry.execute(&step, op).await?;

        let encoded = encode_outcome(&value).map_err(|e| SyncError::Ledger {
            step: step.clone(),
            message: format!("failed to encode outcome: {e}"),
        })?;
        self.ledger
            .record(&call_id, encoded)
            .await
            .map_err(|e| ledger_fault(&step, e))?;

        Ok(value)
    }
}

fn ledger_fault(step: &StepId, error: ActivityError) -> SyncError {
    SyncError::Ledger {
        step: step.clone(),
        message: error.to_string(),
    }
}
