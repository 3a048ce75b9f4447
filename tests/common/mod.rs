//! Mock collaborators for engine integration tests.
//!
//! Provides in-memory implementations of the status and resolver contracts
//! with call tracking and failure injection, so tests can assert exactly
//! which lookups ran, simulate transient and permanent collaborator
//! failures, and verify replay behavior across resumed runs.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recipient_sync::models::{
    NotificationRequest, Recipient, RecipientsInfo, WorkflowStatus,
};
use recipient_sync::orchestration::{
    ActivityError, ActivityResult, RecipientResolver, StatusTracker,
};

/// Mock collaborator state: tracked calls, simulated directory data, and
/// injected failures.
#[derive(Debug, Default)]
pub struct MockState {
    /// Every activity invocation, in order, as "activity/detail" keys.
    pub calls: Vec<String>,
    /// Observed status writes.
    pub status_updates: Vec<(String, WorkflowStatus)>,
    /// Team id -> roster members.
    pub rosters: HashMap<String, Vec<Recipient>>,
    /// Group id -> group members.
    pub groups: HashMap<String, Vec<Recipient>>,
    pub all_users: Vec<Recipient>,
    pub entire_teams: Vec<Recipient>,
    pub csv_users: Vec<Recipient>,
    /// Simulated persisted partials, per notification. Survives across
    /// runs like the real storage collaborator would.
    pub partials: HashMap<String, Vec<RecipientsInfo>>,
    /// Step key -> number of remaining transient failures.
    transient_failures: HashMap<String, u32>,
    /// Step keys that always fail.
    permanent_failures: HashSet<String>,
}

/// Mock implementation of both collaborator contracts.
#[derive(Debug, Clone, Default)]
pub struct MockActivities {
    state: Arc<Mutex<MockState>>,
}

impl MockActivities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all_users(self, ids: &[&str]) -> Self {
        self.lock().all_users = recipients_of(ids);
        self
    }

    pub fn with_roster(self, team_id: &str, ids: &[&str]) -> Self {
        self.lock().rosters.insert(team_id.to_string(), recipients_of(ids));
        self
    }

    pub fn with_group(self, group_id: &str, ids: &[&str]) -> Self {
        self.lock().groups.insert(group_id.to_string(), recipients_of(ids));
        self
    }

    pub fn with_entire_teams(self, ids: &[&str]) -> Self {
        self.lock().entire_teams = recipients_of(ids);
        self
    }

    pub fn with_csv_users(self, ids: &[&str]) -> Self {
        self.lock().csv_users = recipients_of(ids);
        self
    }

    /// Make the given step key fail its next `n` attempts, then succeed.
    pub fn fail_times(&self, key: &str, n: u32) {
        self.lock().transient_failures.insert(key.to_string(), n);
    }

    /// Make the given step key fail every attempt.
    pub fn fail_always(&self, key: &str) {
        self.lock().permanent_failures.insert(key.to_string());
    }

    /// Stop failing the given step key.
    pub fn heal(&self, key: &str) {
        let mut state = self.lock();
        state.permanent_failures.remove(key);
        state.transient_failures.remove(key);
    }

    /// Snapshot of all recorded call keys, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// How many recorded calls match the given key exactly.
    pub fn call_count(&self, key: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == key).count()
    }

    pub fn status_updates(&self) -> Vec<(String, WorkflowStatus)> {
        self.lock().status_updates.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call, then fail if a failure is scripted for this key.
    fn observe(&self, key: &str) -> ActivityResult<()> {
        let mut state = self.lock();
        state.calls.push(key.to_string());

        if state.permanent_failures.contains(key) {
            return Err(ActivityError::Unavailable {
                message: format!("scripted permanent failure for {key}"),
            });
        }
        if let Some(remaining) = state.transient_failures.get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ActivityError::other(format!(
                    "scripted transient failure for {key}"
                )));
            }
        }
        Ok(())
    }

    /// Persist a partial the way a real lookup activity would.
    fn store_partial(&self, notification_id: &str, partial: &RecipientsInfo) {
        self.lock()
            .partials
            .entry(notification_id.to_string())
            .or_default()
            .push(partial.clone());
    }
}

#[async_trait]
impl StatusTracker for MockActivities {
    async fn set_status(
        &self,
        notification_id: &str,
        status: WorkflowStatus,
    ) -> ActivityResult<()> {
        self.observe(&format!("status/{status}"))?;
        self.lock()
            .status_updates
            .push((notification_id.to_string(), status));
        Ok(())
    }
}

#[async_trait]
impl RecipientResolver for MockActivities {
    async fn sync_all_users(
        &self,
        _notification: &NotificationRequest,
    ) -> ActivityResult<RecipientsInfo> {
        self.observe("all_users")?;
        Ok(self.lock().all_users.iter().cloned().collect())
    }

    async fn sync_team_members(
        &self,
        notification_id: &str,
        team_id: &str,
        _index: usize,
    ) -> ActivityResult<RecipientsInfo> {
        self.observe(&format!("team_roster/{team_id}"))?;
        let members: RecipientsInfo = self
            .lock()
            .rosters
            .get(team_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();
        self.store_partial(notification_id, &members);
        Ok(members)
    }

    async fn sync_group_members(
        &self,
        notification_id: &str,
        group_id: &str,
        _index: usize,
    ) -> ActivityResult<RecipientsInfo> {
        self.observe(&format!("group/{group_id}"))?;
        let members: RecipientsInfo = self
            .lock()
            .groups
            .get(group_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();
        self.store_partial(notification_id, &members);
        Ok(members)
    }

    async fn sync_entire_teams(
        &self,
        _notification: &NotificationRequest,
    ) -> ActivityResult<RecipientsInfo> {
        self.observe("entire_teams")?;
        Ok(self.lock().entire_teams.iter().cloned().collect())
    }

    async fn sync_csv_users(
        &self,
        _notification: &NotificationRequest,
    ) -> ActivityResult<RecipientsInfo> {
        self.observe("csv_users")?;
        Ok(self.lock().csv_users.iter().cloned().collect())
    }

    async fn aggregate_partial_results(
        &self,
        notification_id: &str,
    ) -> ActivityResult<RecipientsInfo> {
        self.observe("aggregate")?;
        let partials = self
            .lock()
            .partials
            .get(notification_id)
            .cloned()
            .unwrap_or_default();
        Ok(RecipientsInfo::merge_all(partials))
    }
}

fn recipients_of(ids: &[&str]) -> Vec<Recipient> {
    ids.iter().map(|id| Recipient::new(*id)).collect()
}
