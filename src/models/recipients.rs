//! Recipient aggregates.
//!
//! [`RecipientsInfo`] is the workflow's result type: a deduplicated set of
//! recipients keyed by recipient id. Lookups produce one partial
//! `RecipientsInfo` per entity; the merge operations here are the canonical
//! identifier-union used to fold partials into the final set, so duplicate
//! memberships across entities always collapse to a single entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One addressable destination for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Stable recipient identifier (user AAD id or conversation owner id).
    pub recipient_id: String,
    /// Conversation reference used for delivery, when already established.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Service endpoint the conversation lives on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
}

impl Recipient {
    /// Create a recipient with no delivery metadata yet.
    pub fn new(recipient_id: impl Into<String>) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            conversation_id: None,
            service_url: None,
        }
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = Some(service_url.into());
        self
    }
}

/// Deduplicated recipient set produced by one sync run.
///
/// Backed by an ordered map so iteration and serialization are deterministic
/// across replays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientsInfo {
    recipients: BTreeMap<String, Recipient>,
}

impl RecipientsInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unique recipients.
    pub fn count(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn contains(&self, recipient_id: &str) -> bool {
        self.recipients.contains_key(recipient_id)
    }

    pub fn get(&self, recipient_id: &str) -> Option<&Recipient> {
        self.recipients.get(recipient_id)
    }

    /// Insert one recipient. A recipient already present keeps its existing
    /// entry; the first delivery metadata observed for an id wins, which
    /// keeps the merge order-insensitive at the set level.
    pub fn insert(&mut self, recipient: Recipient) {
        self.recipients
            .entry(recipient.recipient_id.clone())
            .or_insert(recipient);
    }

    /// Fold another partial result into this one by identifier union.
    pub fn merge(&mut self, other: RecipientsInfo) {
        for (_, recipient) in other.recipients {
            self.insert(recipient);
        }
    }

    /// Merge any number of partial results into one canonical set.
    pub fn merge_all(partials: impl IntoIterator<Item = RecipientsInfo>) -> Self {
        let mut merged = Self::new();
        for partial in partials {
            merged.merge(partial);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.values()
    }

    /// Recipient ids in deterministic order.
    pub fn recipient_ids(&self) -> Vec<&str> {
        self.recipients.keys().map(String::as_str).collect()
    }
}

impl FromIterator<Recipient> for RecipientsInfo {
    fn from_iter<I: IntoIterator<Item = Recipient>>(iter: I) -> Self {
        let mut info = Self::new();
        for recipient in iter {
            info.insert(recipient);
        }
        info
    }
}
