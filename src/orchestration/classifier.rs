//! # Audience Classifier
//!
//! Maps a notification request to exactly one audience branch.
//!
//! Upstream data may incorrectly populate more than one audience field, so
//! classification uses a fixed priority order instead of exclusivity
//! validation: picking deterministically keeps replays of the same request
//! on the same branch. Checked in order, first match wins:
//! all-users → team rosters → groups → entire teams → CSV users.

use crate::models::{Audience, NotificationRequest};
use tracing::debug;

use super::errors::{SyncError, SyncResult};

/// Pick exactly one audience branch for the request.
///
/// Fails with [`SyncError::InvalidAudience`] when no recognized, non-empty
/// audience field is populated.
pub fn classify(notification: &NotificationRequest) -> SyncResult<Audience> {
    let audience = if notification.all_users {
        Audience::AllUsers
    } else if !notification.rosters.is_empty() {
        Audience::TeamRosters {
            ids: notification.rosters.clone(),
        }
    } else if !notification.groups.is_empty() {
        Audience::Groups {
            ids: notification.groups.clone(),
        }
    } else if !notification.teams.is_empty() {
        Audience::EntireTeams {
            ids: notification.teams.clone(),
        }
    } else if !notification.csv_users.trim().is_empty() {
        Audience::CsvUsers {
            raw: notification.csv_users.clone(),
        }
    } else {
        return Err(SyncError::InvalidAudience {
            notification_id: notification.id.clone(),
        });
    };

    debug!(notification_id = %notification.id, audience = %audience, "audience classified");
    Ok(audience)
}
