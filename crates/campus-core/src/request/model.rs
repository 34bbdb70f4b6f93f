//! Service request domain model.
//!
//! Status is backend-authoritative. The backend speaks a richer workflow
//! vocabulary (`submitted`, `under_review`, ...) which is folded into the
//! five statuses the portal displays.

use crate::ids::string_or_number;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Display status of a request or application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    NeedsAction,
    InProgress,
    Unknown,
}

impl RequestStatus {
    /// Maps a backend status string onto the display status.
    pub fn from_backend(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "submitted" | "draft" | "pending_review" => RequestStatus::Pending,
            "approved" | "completed" | "active" | "verified" => RequestStatus::Approved,
            "rejected" | "cancelled" | "failed" => RequestStatus::Rejected,
            "needs_action" | "pending_approval" | "more_info" => RequestStatus::NeedsAction,
            "in_progress" | "under_review" => RequestStatus::InProgress,
            _ => RequestStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::NeedsAction => "needs_action",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Unknown => "unknown",
        }
    }

    /// Whether an admin still has to act on the item.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            RequestStatus::Pending | RequestStatus::InProgress | RequestStatus::NeedsAction
        )
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RequestStatus::from_backend(&raw))
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// A student-submitted service ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub request_number: Option<String>,
    pub title: String,
    pub request_type: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewServiceRequest {
    pub request_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<serde_json::Value>,
}

/// Query string of `GET /requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for RequestQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            status_filter: None,
            request_type: None,
            search: None,
        }
    }
}

/// Paged response of `GET /requests`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub requests: Vec<ServiceRequest>,
}

/// Known request types offered by the portal.
pub const REQUEST_TYPES: &[&str] = &[
    "bonafide_certificate",
    "character_certificate",
    "transfer_certificate",
    "degree_certificate",
    "fee_receipt",
    "scholarship_application",
    "refund_request",
    "transcript_request",
    "course_registration",
    "exam_form",
    "grade_revaluation",
    "id_card_request",
    "library_no_dues",
    "hostel_application",
    "event_permission",
];
