//! # Data Models
//!
//! Core data types shared across the recipient sync workflow: the immutable
//! notification request, the classified audience, recipient aggregates, and
//! the observable notification status.

pub mod audience;
pub mod notification;
pub mod recipients;

pub use audience::Audience;
pub use notification::{NotificationRequest, WorkflowStatus};
pub use recipients::{Recipient, RecipientsInfo};
