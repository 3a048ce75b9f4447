//! # Fan-Out/Fan-In Coordinator
//!
//! Multi-entity audiences (team rosters, directory groups) resolve as one
//! independent lookup per entity. Lookups run concurrently behind a
//! semaphore, every one individually retried and ledgered under its stable
//! task identity, and a full barrier joins them before the single
//! aggregation step merges the recorded partials.
//!
//! The fan-in is all-or-nothing: if any lookup exhausts its retry budget
//! the whole fan-out fails and the aggregation call is never made, so a
//! partial recipient set is never returned as if complete.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::models::RecipientsInfo;

use super::activities::RecipientResolver;
use super::durable::DurableContext;
use super::errors::{ActivityError, SyncResult};
use super::types::{EntityLookupTask, LookupKind, StepId};

pub(crate) struct FanOutCoordinator<'a> {
    pub ctx: &'a DurableContext,
    pub resolver: &'a Arc<dyn RecipientResolver>,
    pub lookup_permits: &'a Arc<Semaphore>,
}

impl FanOutCoordinator<'_> {
    /// Dispatch one lookup per entity, wait for all to finish, then run the
    /// aggregation step over the recorded partials.
    pub async fn fan_out(
        &self,
        notification_id: &str,
        entity_ids: &[String],
        kind: LookupKind,
    ) -> SyncResult<RecipientsInfo> {
        let tasks: Vec<EntityLookupTask> = entity_ids
            .iter()
            .enumerate()
            .map(|(i, entity_id)| EntityLookupTask {
                notification_id: notification_id.to_string(),
                entity_id: entity_id.clone(),
                index: i + 1,
                kind,
            })
            .collect();

        info!(
            notification_id,
            kind = %kind,
            entities = tasks.len(),
            "fanning out entity lookups"
        );

        let lookups = tasks.iter().map(|task| self.lookup(task));

        // Fan-in: a barrier over every lookup, not a race. Completion order
        // is unspecified; failure reporting is ordered by task index.
        let results = join_all(lookups).await;

        let mut resolved = 0usize;
        for result in results {
            resolved += result?.count();
        }
        debug!(
            notification_id,
            kind = %kind,
            partial_recipient_candidates = resolved,
            "all entity lookups complete"
        );

        // Batch recipients: merges the partials recorded for this
        // notification, reading from the now-complete parallel tasks.
        let resolver = Arc::clone(self.resolver);
        let id = notification_id.to_string();
        self.ctx
            .call(notification_id, StepId::Aggregate, move || {
                let resolver = Arc::clone(&resolver);
                let id = id.clone();
                async move { resolver.aggregate_partial_results(&id).await }
            })
            .await
    }

    /// One ledgered, retried entity lookup. The concurrency permit is
    /// acquired inside the retried operation so a task backing off does not
    /// hold a worker slot, and a replayed task never takes one at all.
    async fn lookup(&self, task: &EntityLookupTask) -> SyncResult<RecipientsInfo> {
        let resolver = Arc::clone(self.resolver);
        let permits = Arc::clone(self.lookup_permits);
        let notification_id = task.notification_id.clone();
        let task = task.clone();
        let step = task.step_id();

        self.ctx
            .call(&notification_id, step, move || {
                let resolver = Arc::clone(&resolver);
                let permits = Arc::clone(&permits);
                let task = task.clone();
                async move {
                    let _permit =
                        permits.acquire_owned().await.map_err(|_| ActivityError::Unavailable {
                            message: "lookup concurrency limiter closed".to_string(),
                        })?;
                    match task.kind {
                        LookupKind::TeamRoster => {
                            resolver
                                .sync_team_members(
                                    &task.notification_id,
                                    &task.entity_id,
                                    task.index,
                                )
                                .await
                        }
                        LookupKind::Group => {
                            resolver
                                .sync_group_members(
                                    &task.notification_id,
                                    &task.entity_id,
                                    task.index,
                                )
                                .await
                        }
                    }
                }
            })
            .await
    }
}
