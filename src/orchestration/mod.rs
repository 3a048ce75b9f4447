//! # Recipient Sync Orchestration
//!
//! The workflow core: a deterministic, replay-safe engine that classifies a
//! notification's audience, fans out membership lookups, and folds partial
//! results into one deduplicated recipient set.
//!
//! ## Core Components
//!
//! - **SyncEngine**: runs one sync end-to-end as a strict step sequence
//! - **Audience Classifier**: fixed-priority branch selection
//! - **FanOutCoordinator**: parallel per-entity lookups with a join barrier
//! - **RetryPolicy**: one uniform backoff/budget wrapper for every call
//! - **ExecutionLedger**: the injected replay substrate recording outcomes
//!
//! ## Replay Discipline
//!
//! Every side-effecting call carries a stable identity ([`StepId`]) and goes
//! through the ledger: recorded outcomes are returned without re-issuing the
//! call, unrecorded calls run under the retry policy and record their
//! success. Failures are never recorded, so a restarted run re-issues only
//! its unfinished calls.

pub mod activities;
pub mod classifier;
mod durable;
pub mod engine;
pub mod errors;
mod fan_out;
pub mod ledger;
pub mod retry;
pub mod types;

pub use activities::{ActivityResult, RecipientResolver, StatusTracker};
pub use classifier::classify;
pub use engine::SyncEngine;
pub use errors::{ActivityError, SyncError, SyncResult};
pub use ledger::{ExecutionLedger, InMemoryLedger, LedgerEntry};
pub use retry::RetryPolicy;
pub use types::{EntityLookupTask, LookupKind, StepId, SyncRunState};
