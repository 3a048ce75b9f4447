//! # Sync Error Types
//!
//! Structured error handling for the sync workflow using thiserror.
//!
//! Two layers exist by design. [`ActivityError`] is what collaborators
//! return; every variant is treated as transient and absorbed by the retry
//! policy. [`SyncError`] is the terminal taxonomy the engine surfaces to its
//! caller: an unresolvable audience, an exhausted retry budget (carrying the
//! identity of the failed step), or a ledger fault.

use super::types::StepId;
use thiserror::Error;

/// Failure of a single collaborator call attempt.
///
/// The retry policy retries all variants uniformly; the distinction exists
/// for logging and for collaborators to report what actually happened.
#[derive(Debug, Clone, Error)]
pub enum ActivityError {
    #[error("Collaborator call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Collaborator throttled the request: {message}")]
    Throttled { message: String },

    #[error("Collaborator unavailable: {message}")]
    Unavailable { message: String },

    #[error("Collaborator call failed: {message}")]
    Other { message: String },
}

impl ActivityError {
    /// Convenience constructor for ad-hoc collaborator failures.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Terminal failure of one sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No recognized, non-empty audience field on the request. Fatal and
    /// never retried.
    #[error("Invalid audience selected for notification id: {notification_id}")]
    InvalidAudience { notification_id: String },

    /// A step exhausted the shared retry budget. Carries the step identity
    /// so the caller can tell which lookup (by kind, entity, and index)
    /// failed.
    #[error("Retry budget exhausted after {attempts} attempts at step {step}: {source}")]
    RetryExhausted {
        step: StepId,
        attempts: u32,
        #[source]
        source: ActivityError,
    },

    /// A recorded outcome could not be serialized or deserialized.
    #[error("Execution ledger error at step {step}: {message}")]
    Ledger { step: StepId, message: String },
}

impl SyncError {
    /// The step this error is attributed to, when one exists.
    pub fn step(&self) -> Option<&StepId> {
        match self {
            Self::InvalidAudience { .. } => None,
            Self::RetryExhausted { step, .. } | Self::Ledger { step, .. } => Some(step),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::types::LookupKind;

    #[test]
    fn test_retry_exhausted_names_the_failed_step() {
        let err = SyncError::RetryExhausted {
            step: StepId::EntityLookup {
                kind: LookupKind::Group,
                entity_id: "G1".to_string(),
                index: 2,
            },
            attempts: 3,
            source: ActivityError::Timeout { timeout_ms: 500 },
        };

        let text = err.to_string();
        assert!(text.contains("group/2/G1"));
        assert!(text.contains("3 attempts"));
        assert!(err.step().is_some());
    }

    #[test]
    fn test_invalid_audience_carries_notification_id() {
        let err = SyncError::InvalidAudience {
            notification_id: "n42".to_string(),
        };
        assert!(err.to_string().contains("n42"));
        assert!(err.step().is_none());
    }
}
