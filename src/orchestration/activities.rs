//! # Collaborator Contracts
//!
//! The narrow interfaces the sync workflow consumes. Their implementations
//! (directory lookups, recipient storage, status persistence) live outside
//! this crate; the engine only depends on these traits and always invokes
//! them through the shared retry policy and the execution ledger — never
//! directly.

use crate::models::{NotificationRequest, RecipientsInfo, WorkflowStatus};
use async_trait::async_trait;

use super::errors::ActivityError;

pub type ActivityResult<T> = Result<T, ActivityError>;

/// Write-only status persistence contract.
///
/// Implementations must be idempotent under repeated identical calls: the
/// engine may re-emit a status on replay before recognizing the call
/// already completed. Last-write-wins on the status field satisfies this.
#[async_trait]
pub trait StatusTracker: Send + Sync {
    async fn set_status(
        &self,
        notification_id: &str,
        status: WorkflowStatus,
    ) -> ActivityResult<()>;
}

/// Membership resolution contract.
///
/// Each operation resolves one slice of the audience into a partial
/// [`RecipientsInfo`]. Per-entity operations receive the fan-out index so
/// implementations can tag persisted partials with a stable identity.
/// `aggregate_partial_results` runs once after a fan-out join and merges the
/// partials previously persisted for that notification — implementations
/// typically delegate the union itself to [`RecipientsInfo::merge_all`].
#[async_trait]
pub trait RecipientResolver: Send + Sync {
    /// Resolve the entire-tenant audience.
    async fn sync_all_users(
        &self,
        notification: &NotificationRequest,
    ) -> ActivityResult<RecipientsInfo>;

    /// Resolve one team's roster members.
    async fn sync_team_members(
        &self,
        notification_id: &str,
        team_id: &str,
        index: usize,
    ) -> ActivityResult<RecipientsInfo>;

    /// Resolve one directory group's members.
    async fn sync_group_members(
        &self,
        notification_id: &str,
        group_id: &str,
        index: usize,
    ) -> ActivityResult<RecipientsInfo>;

    /// Resolve general-channel recipients for the request's whole teams as
    /// a single call.
    async fn sync_entire_teams(
        &self,
        notification: &NotificationRequest,
    ) -> ActivityResult<RecipientsInfo>;

    /// Resolve the raw CSV user list into validated recipients.
    async fn sync_csv_users(
        &self,
        notification: &NotificationRequest,
    ) -> ActivityResult<RecipientsInfo>;

    /// Merge the partial results previously recorded for this notification
    /// into one canonical recipient set.
    async fn aggregate_partial_results(
        &self,
        notification_id: &str,
    ) -> ActivityResult<RecipientsInfo>;
}
