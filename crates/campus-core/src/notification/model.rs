//! Notification domain model.

use crate::ids::{opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};

/// A notification delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default, alias = "type")]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub request_id: Option<String>,
    #[serde(default, alias = "created_at")]
    pub sent_at: Option<String>,
    #[serde(default, alias = "link")]
    pub action_url: Option<String>,
}

impl Notification {
    /// Link the notification points to: an explicit URL, else the related request.
    pub fn action_link(&self) -> Option<String> {
        self.action_url
            .clone()
            .or_else(|| self.request_id.as_ref().map(|id| format!("/requests/{id}")))
    }
}

/// Delivery state of the backend mirror of a local read mark.
///
/// A boolean "read" flag cannot tell a confirmed mark from one whose mirror
/// call failed; this tag can.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MirrorState {
    /// Local state equals what the backend last reported.
    #[default]
    Synced,
    /// Marked read locally, backend call in flight.
    Pending,
    /// Marked read locally and acknowledged by the backend.
    Confirmed,
    /// Marked read locally, backend call failed. The local mark is kept.
    Failed { error: String },
}

impl MirrorState {
    /// Whether the local read flag must win over a server refresh.
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, MirrorState::Pending | MirrorState::Failed { .. })
    }
}
