#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Recipient Sync Core
//!
//! Crash-resumable audience resolution for broadcast notifications: given a
//! notification with a declared audience (all organization users, team
//! rosters, directory groups, whole-team channels, or a CSV user list),
//! classify the audience, resolve membership for every addressed entity,
//! and produce a single deduplicated recipient set.
//!
//! ## Architecture
//!
//! The crate is a workflow core over injected collaborators. Directory
//! lookups, recipient storage, and status persistence live behind the
//! [`orchestration::RecipientResolver`] and [`orchestration::StatusTracker`]
//! traits; the engine owns only control flow, retry policy, aggregation,
//! and the replay discipline that makes restarts safe. Every
//! side-effecting call carries a stable identity and is recorded in an
//! injected [`orchestration::ExecutionLedger`], so a re-run after a crash
//! skips completed work instead of repeating it.
//!
//! ## Module Organization
//!
//! - [`models`] - notification request, audience, recipient aggregates
//! - [`orchestration`] - engine, classifier, fan-out, retry, ledger
//! - [`config`] - environment-aware configuration loading
//! - [`error`] - crate-level error umbrella
//! - [`logging`] - structured logging bootstrap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recipient_sync::models::NotificationRequest;
//! use recipient_sync::orchestration::{InMemoryLedger, SyncEngine};
//! # use recipient_sync::orchestration::{RecipientResolver, StatusTracker};
//!
//! # async fn example(
//! #     resolver: Arc<dyn RecipientResolver>,
//! #     status: Arc<dyn StatusTracker>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = SyncEngine::new(resolver, status, Arc::new(InMemoryLedger::new()));
//!
//! let mut notification = NotificationRequest::new("n1");
//! notification.rosters = vec!["T1".to_string(), "T2".to_string()];
//!
//! let recipients = engine.run(&notification).await?;
//! println!("resolved {} recipients", recipients.count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;

pub use config::{ConfigManager, RecipientSyncConfig};
pub use error::{RecipientSyncError, Result};
pub use models::{Audience, NotificationRequest, Recipient, RecipientsInfo, WorkflowStatus};
pub use orchestration::{
    ActivityError, ExecutionLedger, InMemoryLedger, RecipientResolver, RetryPolicy, StatusTracker,
    StepId, SyncEngine, SyncError,
};
