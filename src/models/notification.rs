//! Notification request and status types.
//!
//! A [`NotificationRequest`] is the immutable input to one sync run. Audience
//! fields mirror the upstream notification record: several may be populated
//! by a misbehaving producer, and the classifier resolves that by priority
//! rather than rejecting the request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable input to the recipient sync workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Unique notification identifier.
    pub id: String,
    /// Target every user in the organization.
    pub all_users: bool,
    /// Team ids whose rosters (members) are targeted.
    pub rosters: Vec<String>,
    /// Directory group ids whose members are targeted.
    pub groups: Vec<String>,
    /// Team ids whose general channel is targeted as a whole.
    pub teams: Vec<String>,
    /// Raw CSV-encoded user list. Syntax-checked upstream; membership is
    /// validated during sync.
    pub csv_users: String,
}

impl NotificationRequest {
    /// Create a request with the given id and no audience populated.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Notification progress marker persisted alongside the notification record.
///
/// Transitions: `Queued → SyncingRecipients → Synced | Failed`. The engine
/// only ever emits `SyncingRecipients`; the terminal transitions belong to
/// the caller once it observes the run's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Notification accepted, sync not yet started.
    Queued,
    /// Recipient resolution is in progress.
    SyncingRecipients,
    /// Recipient set resolved and persisted.
    Synced,
    /// Recipient resolution terminally failed.
    Failed,
}

impl WorkflowStatus {
    /// Check if this is a terminal state (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Synced | Self::Failed)
    }

    /// Check if recipient resolution is currently underway.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::SyncingRecipients)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::SyncingRecipients => write!(f, "syncing_recipients"),
            Self::Synced => write!(f, "synced"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "syncing_recipients" => Ok(Self::SyncingRecipients),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid workflow status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        for status in [
            WorkflowStatus::Queued,
            WorkflowStatus::SyncingRecipients,
            WorkflowStatus::Synced,
            WorkflowStatus::Failed,
        ] {
            let parsed = WorkflowStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(WorkflowStatus::Synced.is_terminal());
        assert!(WorkflowStatus::Failed.is_terminal());
        assert!(!WorkflowStatus::SyncingRecipients.is_terminal());
        assert!(!WorkflowStatus::Queued.is_terminal());
        assert!(WorkflowStatus::SyncingRecipients.is_active());
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(WorkflowStatus::from_str("sending").is_err());
    }
}
