//! # Orchestration Types
//!
//! Shared types for the sync workflow: durable call identities, fan-out
//! task descriptors, and the engine's run-state marker.

use crate::models::WorkflowStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which per-entity lookup a fan-out dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    /// Members of one team's roster.
    TeamRoster,
    /// Members of one directory group.
    Group,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamRoster => write!(f, "team_roster"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// One unit of fan-out work: a single entity lookup with a stable identity.
///
/// The 1-based `index` gives each parallel task a reproducible identity
/// across replays. A run interrupted mid-fan-out resumes by re-issuing only
/// the tasks whose call id has no recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLookupTask {
    pub notification_id: String,
    pub entity_id: String,
    /// 1-based position within the fan-out.
    pub index: usize,
    pub kind: LookupKind,
}

impl EntityLookupTask {
    pub fn step_id(&self) -> StepId {
        StepId::EntityLookup {
            kind: self.kind,
            entity_id: self.entity_id.clone(),
            index: self.index,
        }
    }
}

/// Identity of one side-effecting workflow step.
///
/// Doubles as the durable call identity (via [`StepId::call_id`]) and as the
/// failure diagnostic carried by retry-exhaustion errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepId {
    /// Status update emitted before audience resolution.
    UpdateStatus { status: WorkflowStatus },
    /// Whole-tenant lookup.
    AllUsers,
    /// One fanned-out entity lookup.
    EntityLookup {
        kind: LookupKind,
        entity_id: String,
        index: usize,
    },
    /// General-channel lookup for whole teams, resolved as a single call.
    EntireTeams,
    /// CSV user list resolution.
    CsvUsers,
    /// Post-join aggregation of recorded partial results.
    Aggregate,
}

impl StepId {
    /// Durable call identity for the execution ledger, scoped to one
    /// notification. Stable across replays by construction.
    pub fn call_id(&self, notification_id: &str) -> String {
        format!("{notification_id}/{self}")
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateStatus { status } => write!(f, "update_status/{status}"),
            Self::AllUsers => write!(f, "all_users"),
            Self::EntityLookup {
                kind,
                entity_id,
                index,
            } => write!(f, "{kind}/{index}/{entity_id}"),
            Self::EntireTeams => write!(f, "entire_teams"),
            Self::CsvUsers => write!(f, "csv_users"),
            Self::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// Engine progress marker for one run, used for tracing and diagnostics.
///
/// Transitions only on successful completion of the corresponding step;
/// any terminal failure moves to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunState {
    Start,
    StatusUpdated,
    BranchSelected,
    RecipientsResolved,
    Failed,
}

impl SyncRunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RecipientsResolved | Self::Failed)
    }
}

impl fmt::Display for SyncRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::StatusUpdated => write!(f, "status_updated"),
            Self::BranchSelected => write!(f, "branch_selected"),
            Self::RecipientsResolved => write!(f, "recipients_resolved"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_ids_are_stable_and_distinct() {
        let roster = StepId::EntityLookup {
            kind: LookupKind::TeamRoster,
            entity_id: "T1".to_string(),
            index: 1,
        };
        let group = StepId::EntityLookup {
            kind: LookupKind::Group,
            entity_id: "T1".to_string(),
            index: 1,
        };

        assert_eq!(roster.call_id("n1"), "n1/team_roster/1/T1");
        assert_ne!(roster.call_id("n1"), group.call_id("n1"));
        assert_ne!(roster.call_id("n1"), roster.call_id("n2"));
    }

    #[test]
    fn test_task_step_id_uses_task_identity() {
        let task = EntityLookupTask {
            notification_id: "n1".to_string(),
            entity_id: "G9".to_string(),
            index: 3,
            kind: LookupKind::Group,
        };
        assert_eq!(task.step_id().call_id("n1"), "n1/group/3/G9");
    }
}
