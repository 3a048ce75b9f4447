//! # Orchestration Engine
//!
//! Runs one recipient sync end-to-end as a deterministic sequence of
//! ledgered, retried collaborator calls:
//!
//! 1. mark the notification `syncing_recipients`;
//! 2. classify the audience (fixed priority, first match wins);
//! 3. resolve the branch — a single lookup for all-users / entire-teams /
//!    CSV audiences, fan-out/fan-in for rosters and groups;
//! 4. return the deduplicated [`RecipientsInfo`].
//!
//! Replays of an interrupted run re-derive the same decisions from the same
//! inputs and skip every call the ledger already holds, so no side effect
//! is applied twice and no recipient is counted twice. Advancing the
//! notification to `synced` or `failed` is the caller's responsibility once
//! it observes the run's outcome.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::RecipientSyncConfig;
use crate::models::{Audience, NotificationRequest, RecipientsInfo, WorkflowStatus};

use super::activities::{RecipientResolver, StatusTracker};
use super::classifier;
use super::durable::DurableContext;
use super::errors::SyncResult;
use super::fan_out::FanOutCoordinator;
use super::ledger::ExecutionLedger;
use super::types::{LookupKind, StepId, SyncRunState};

/// The recipient sync workflow engine.
///
/// Collaborators and the execution ledger are injected; the engine owns
/// only control flow, aggregation policy, and failure policy.
pub struct SyncEngine {
    resolver: Arc<dyn RecipientResolver>,
    status: Arc<dyn StatusTracker>,
    ctx: DurableContext,
    lookup_permits: Arc<Semaphore>,
}

impl SyncEngine {
    /// Create an engine with default configuration.
    pub fn new(
        resolver: Arc<dyn RecipientResolver>,
        status: Arc<dyn StatusTracker>,
        ledger: Arc<dyn ExecutionLedger>,
    ) -> Self {
        Self::with_config(resolver, status, ledger, &RecipientSyncConfig::default())
    }

    /// Create an engine from loaded configuration.
    pub fn with_config(
        resolver: Arc<dyn RecipientResolver>,
        status: Arc<dyn StatusTracker>,
        ledger: Arc<dyn ExecutionLedger>,
        config: &RecipientSyncConfig,
    ) -> Self {
        Self {
            resolver,
            status,
            ctx: DurableContext {
                ledger,
                retry: config.retry.to_policy(),
            },
            lookup_permits: Arc::new(Semaphore::new(config.execution.max_concurrent_lookups)),
        }
    }

    /// Run one sync to completion.
    ///
    /// Safe to re-invoke for the same notification after a crash: already
    /// completed steps replay from the ledger and only unfinished work is
    /// re-issued.
    #[instrument(
        name = "sync_run",
        skip_all,
        fields(notification_id = %notification.id, run_id = %Uuid::new_v4())
    )]
    pub async fn run(&self, notification: &NotificationRequest) -> SyncResult<RecipientsInfo> {
        match self.run_inner(notification).await {
            Ok(recipients) => {
                info!(
                    state = %SyncRunState::RecipientsResolved,
                    recipient_count = recipients.count(),
                    "recipient sync complete"
                );
                Ok(recipients)
            }
            Err(e) => {
                error!(state = %SyncRunState::Failed, error = %e, "recipient sync failed");
                Err(e)
            }
        }
    }

    async fn run_inner(&self, notification: &NotificationRequest) -> SyncResult<RecipientsInfo> {
        info!(state = %SyncRunState::Start, "starting recipient sync");

        // Step 1: mark the notification as syncing. Idempotent at the
        // collaborator and skipped entirely on replay once recorded.
        let status = Arc::clone(&self.status);
        let id = notification.id.clone();
        self.ctx
            .call(
                &notification.id,
                StepId::UpdateStatus {
                    status: WorkflowStatus::SyncingRecipients,
                },
                move || {
                    let status = Arc::clone(&status);
                    let id = id.clone();
                    async move { status.set_status(&id, WorkflowStatus::SyncingRecipients).await }
                },
            )
            .await?;
        info!(state = %SyncRunState::StatusUpdated, "notification marked syncing");

        // Step 2: pick exactly one branch.
        let audience = classifier::classify(notification)?;
        info!(
            state = %SyncRunState::BranchSelected,
            audience = %audience,
            fan_out = audience.is_fan_out(),
            "audience branch selected"
        );

        // Step 3: resolve recipients for the branch.
        match audience {
            Audience::AllUsers => {
                self.single_lookup(notification, StepId::AllUsers).await
            }
            Audience::TeamRosters { ids } => {
                self.coordinator()
                    .fan_out(&notification.id, &ids, LookupKind::TeamRoster)
                    .await
            }
            Audience::Groups { ids } => {
                self.coordinator()
                    .fan_out(&notification.id, &ids, LookupKind::Group)
                    .await
            }
            Audience::EntireTeams { .. } => {
                self.single_lookup(notification, StepId::EntireTeams).await
            }
            Audience::CsvUsers { .. } => {
                self.single_lookup(notification, StepId::CsvUsers).await
            }
        }
    }

    /// Single-entity branches: one ledgered, retried lookup returning the
    /// complete recipient set directly.
    async fn single_lookup(
        &self,
        notification: &NotificationRequest,
        step: StepId,
    ) -> SyncResult<RecipientsInfo> {
        let resolver = Arc::clone(&self.resolver);
        let request = notification.clone();
        let lookup_step = step.clone();

        self.ctx
            .call(&notification.id, step, move || {
                let resolver = Arc::clone(&resolver);
                let request = request.clone();
                let lookup_step = lookup_step.clone();
                async move {
                    match lookup_step {
                        StepId::AllUsers => resolver.sync_all_users(&request).await,
                        StepId::EntireTeams => resolver.sync_entire_teams(&request).await,
                        StepId::CsvUsers => resolver.sync_csv_users(&request).await,
                        // Fan-out and bookkeeping steps never reach here.
                        _ => Err(super::errors::ActivityError::other(format!(
                            "step {lookup_step} is not a single lookup"
                        ))),
                    }
                }
            })
            .await
    }

    fn coordinator(&self) -> FanOutCoordinator<'_> {
        FanOutCoordinator {
            ctx: &self.ctx,
            resolver: &self.resolver,
            lookup_permits: &self.lookup_permits,
        }
    }
}
