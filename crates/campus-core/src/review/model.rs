//! Admin review domain model.
//!
//! Each queue kind has its own backend row shape; all of them are normalised
//! into [`ReviewItem`] so the queue logic is shared.

use crate::error::Result;
use crate::ids::string_or_number;
use crate::request::{RequestStatus, ServiceRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which admin queue is being reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Requests,
    Scholarships,
    MemoCards,
    BusPasses,
}

impl QueueKind {
    pub const ALL: [QueueKind; 4] = [
        QueueKind::Requests,
        QueueKind::Scholarships,
        QueueKind::MemoCards,
        QueueKind::BusPasses,
    ];

    /// Whether the backend of this queue accepts the decision.
    ///
    /// Memo cards and bus passes only know approve/reject.
    pub fn supports(&self, action: ReviewAction) -> bool {
        match self {
            QueueKind::Requests | QueueKind::Scholarships => true,
            QueueKind::MemoCards | QueueKind::BusPasses => {
                !matches!(action, ReviewAction::PendingApproval)
            }
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "requests" => Some(QueueKind::Requests),
            "scholarships" | "scholarship" => Some(QueueKind::Scholarships),
            "memo_cards" | "memo" => Some(QueueKind::MemoCards),
            "bus_passes" | "bus" => Some(QueueKind::BusPasses),
            _ => None,
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            QueueKind::Requests => "requests",
            QueueKind::Scholarships => "scholarships",
            QueueKind::MemoCards => "memo_cards",
            QueueKind::BusPasses => "bus_passes",
        };
        f.write_str(text)
    }
}

/// Status tab of a queue view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTab {
    #[default]
    Pending,
    Approved,
    Rejected,
    All,
}

impl StatusTab {
    pub fn matches(&self, status: RequestStatus) -> bool {
        match self {
            StatusTab::Pending => status.is_open(),
            StatusTab::Approved => status == RequestStatus::Approved,
            StatusTab::Rejected => status == RequestStatus::Rejected,
            StatusTab::All => true,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(StatusTab::Pending),
            "approved" => Some(StatusTab::Approved),
            "rejected" => Some(StatusTab::Rejected),
            "all" => Some(StatusTab::All),
            _ => None,
        }
    }
}

/// Admin decision. `PendingApproval` asks the student for more information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approved,
    Rejected,
    PendingApproval,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewAction::Approved => "approved",
            ReviewAction::Rejected => "rejected",
            ReviewAction::PendingApproval => "pending_approval",
        }
    }

    /// Verb recorded in the request workflow log.
    pub fn workflow_verb(&self) -> &'static str {
        match self {
            ReviewAction::Approved => "approve",
            ReviewAction::Rejected => "reject",
            ReviewAction::PendingApproval => "request_info",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Some(ReviewAction::Approved),
            "reject" | "rejected" => Some(ReviewAction::Rejected),
            "more-info" | "more_info" | "pending" | "pending_approval" => {
                Some(ReviewAction::PendingApproval)
            }
            _ => None,
        }
    }
}

/// A decision plus the reviewer's comments.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDecision {
    pub action: ReviewAction,
    pub comments: Option<String>,
}

impl ReviewDecision {
    pub fn new(action: ReviewAction, comments: Option<String>) -> Self {
        let comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { action, comments }
    }
}

/// Body of `POST /requests/{id}/workflow`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowAction {
    pub action: String,
    pub to_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl From<&ReviewDecision> for WorkflowAction {
    fn from(decision: &ReviewDecision) -> Self {
        Self {
            action: decision.action.workflow_verb().to_string(),
            to_status: decision.action.as_str().to_string(),
            comments: decision.comments.clone(),
        }
    }
}

/// One row of an admin queue.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub id: String,
    pub reference: String,
    pub title: String,
    pub status: RequestStatus,
    pub submitted_date: Option<String>,
    pub documents_count: Option<u32>,
    /// The row exactly as the backend sent it.
    pub raw: Value,
}

impl ReviewItem {
    /// Normalises one backend row of the given queue.
    pub fn from_row(kind: QueueKind, row: Value) -> Result<Self> {
        let mut item: ReviewItem = match kind {
            QueueKind::Requests => serde_json::from_value::<ServiceRequest>(row.clone())?.into(),
            QueueKind::Scholarships => {
                serde_json::from_value::<PendingApplicationRow>(row.clone())?.into()
            }
            QueueKind::MemoCards => serde_json::from_value::<MemoCardRow>(row.clone())?.into(),
            QueueKind::BusPasses => serde_json::from_value::<BusPassRow>(row.clone())?.into(),
        };
        item.raw = row;
        Ok(item)
    }
}

impl From<ServiceRequest> for ReviewItem {
    fn from(request: ServiceRequest) -> Self {
        Self {
            reference: request
                .request_number
                .clone()
                .unwrap_or_else(|| request.id.clone()),
            id: request.id,
            title: request.title,
            status: request.status,
            submitted_date: request.created_at,
            documents_count: None,
            raw: Value::Null,
        }
    }
}

/// Row of `GET /scholarship-verification/admin/pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingApplicationRow {
    #[serde(deserialize_with = "string_or_number")]
    pub request_id: String,
    pub application_number: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub documents_count: Option<u32>,
}

impl From<PendingApplicationRow> for ReviewItem {
    fn from(row: PendingApplicationRow) -> Self {
        let applicant = row
            .data
            .as_ref()
            .and_then(|data| data.get("full_name"))
            .and_then(|name| name.as_str())
            .unwrap_or("Unknown applicant")
            .to_string();
        Self {
            id: row.request_id,
            reference: row.application_number,
            title: format!("Scholarship Application - {applicant}"),
            status: row.status,
            submitted_date: row.submitted_date,
            documents_count: row.documents_count,
            raw: Value::Null,
        }
    }
}

/// Row of `GET /memo-cards/admin/all`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoCardRow {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub memo_id: String,
    pub semester: String,
    pub academic_year: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub document_path: Option<String>,
}

impl From<MemoCardRow> for ReviewItem {
    fn from(row: MemoCardRow) -> Self {
        Self {
            id: row.id,
            reference: row.memo_id,
            title: format!("Memo card - {} ({})", row.semester, row.academic_year),
            status: row.status,
            submitted_date: row.created_at,
            documents_count: Some(u32::from(row.document_path.is_some())),
            raw: Value::Null,
        }
    }
}

/// Row of `GET /bus-passes/admin/all`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusPassRow {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub pass_id: String,
    pub route: String,
    pub boarding_point: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<BusPassRow> for ReviewItem {
    fn from(row: BusPassRow) -> Self {
        Self {
            id: row.id,
            reference: row.pass_id,
            title: format!("Bus pass - {} from {}", row.route, row.boarding_point),
            status: row.status,
            submitted_date: row.created_at,
            documents_count: None,
            raw: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_and_bus_reject_more_info() {
        assert!(!QueueKind::MemoCards.supports(ReviewAction::PendingApproval));
        assert!(!QueueKind::BusPasses.supports(ReviewAction::PendingApproval));
        assert!(QueueKind::Scholarships.supports(ReviewAction::PendingApproval));
        assert!(QueueKind::BusPasses.supports(ReviewAction::Approved));
    }

    #[test]
    fn test_workflow_body() {
        let decision = ReviewDecision::new(ReviewAction::Rejected, Some("  blurry scan ".into()));
        let body = WorkflowAction::from(&decision);
        assert_eq!(body.action, "reject");
        assert_eq!(body.to_status, "rejected");
        assert_eq!(body.comments.as_deref(), Some("blurry scan"));
    }

    #[test]
    fn test_blank_comments_are_dropped() {
        let decision = ReviewDecision::new(ReviewAction::Approved, Some("   ".into()));
        assert!(decision.comments.is_none());
    }

    #[test]
    fn test_pending_row_title_uses_applicant() {
        let row: PendingApplicationRow = serde_json::from_str(
            r#"{"request_id": "r1", "application_number": "SCH-20240101-ABCD",
                "status": "submitted", "data": {"full_name": "A B"}, "documents_count": 2}"#,
        )
        .unwrap();
        let item = ReviewItem::from(row);
        assert_eq!(item.title, "Scholarship Application - A B");
        assert_eq!(item.documents_count, Some(2));
        assert_eq!(item.status, RequestStatus::Pending);
    }

    #[test]
    fn test_memo_row_uses_mongo_id() {
        let row: MemoCardRow = serde_json::from_str(
            r#"{"_id": "65f0", "user_id": "u", "memo_id": "MC-2024-U-001", "semester": "5",
                "academic_year": "2024-25", "issue_date": "", "expiry_date": "",
                "status": "rejected", "created_at": "2024-01-01"}"#,
        )
        .unwrap();
        let item = ReviewItem::from(row);
        assert_eq!(item.id, "65f0");
        assert_eq!(item.status, RequestStatus::Rejected);
    }

    #[test]
    fn test_from_row_keeps_raw_bus_pass() {
        let row = serde_json::json!({
            "_id": "b1", "pass_id": "BP-1", "route": "Route 4",
            "boarding_point": "Main Gate", "status": "pending"
        });
        let item = ReviewItem::from_row(QueueKind::BusPasses, row.clone()).unwrap();
        assert_eq!(item.title, "Bus pass - Route 4 from Main Gate");
        assert_eq!(item.raw, row);
    }

    #[test]
    fn test_from_row_rejects_wrong_shape() {
        let err = ReviewItem::from_row(QueueKind::MemoCards, serde_json::json!({"id": 1}));
        assert!(err.is_err());
    }

    #[test]
    fn test_tabs() {
        assert!(StatusTab::Pending.matches(RequestStatus::InProgress));
        assert!(!StatusTab::Pending.matches(RequestStatus::Approved));
        assert!(StatusTab::All.matches(RequestStatus::Unknown));
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(ReviewAction::parse("approve"), Some(ReviewAction::Approved));
        assert_eq!(ReviewAction::parse("more-info"), Some(ReviewAction::PendingApproval));
        assert_eq!(ReviewAction::parse("escalate"), None);
    }
}
