use campus_core::notification::Notification;
use campus_core::request::{RequestPage, RequestStatus};
use campus_core::review::{QueueKind, ReviewItem};
use campus_core::scholarship::{ApplicationStatus, VerificationStatus};
use campus_core::session::{TokenResponse, UserRole};
use serde_json::json;

#[test]
fn test_login_response_with_numeric_user_id() {
    let body = json!({
        "access_token": "a.b.c",
        "refresh_token": "r.s.t",
        "token_type": "bearer",
        "user": {
            "id": 7,
            "username": "registrar",
            "email": "registrar@campus.edu",
            "full_name": "Office of the Registrar",
            "role": "super_admin",
            "status": "active"
        }
    });

    let tokens: TokenResponse = serde_json::from_value(body).unwrap();
    assert_eq!(tokens.user.id, "7");
    assert_eq!(tokens.user.role, UserRole::SuperAdmin);
    assert!(tokens.user.role.is_admin());
}

#[test]
fn test_unknown_role_is_not_admin() {
    let user = json!({
        "id": "u-9", "username": "guest", "email": "g@campus.edu", "role": "visitor"
    });
    let user: campus_core::session::AuthUser = serde_json::from_value(user).unwrap();
    assert_eq!(user.role, UserRole::Other);
    assert!(!user.role.is_admin());
}

#[test]
fn test_request_page_maps_backend_statuses() {
    let body = json!({
        "requests": [
            {"id": 1, "title": "Bonafide letter", "request_type": "certificate", "status": "submitted"},
            {"id": "2", "title": "Fee receipt copy", "request_type": "certificate", "status": "completed", "priority": "high"},
            {"id": 3, "title": "Hostel change", "request_type": "hostel", "status": "on_hold"}
        ],
        "total": 3,
        "page": 1,
        "page_size": 10
    });

    let page: RequestPage = serde_json::from_value(body).unwrap();
    let statuses: Vec<RequestStatus> = page.requests.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Unknown
        ]
    );
    assert_eq!(page.requests[0].id, "1");
}

#[test]
fn test_status_documents_in_both_shapes() {
    let body = json!({
        "request_id": 42,
        "application_number": "SCH-20240601-A1B2",
        "status": "in_progress",
        "documents": [
            {"id": 5, "type": "ID Proof", "filename": "id.pdf", "status": "verified", "score": 91.0},
            {"id": "6", "document_type": "Income Certificate", "original_filename": "income.jpg", "is_verified": false}
        ]
    });

    let status: ApplicationStatus = serde_json::from_value(body).unwrap();
    assert_eq!(status.request_id, "42");
    assert_eq!(status.documents[0].verification_status, VerificationStatus::Verified);
    assert_eq!(status.documents[0].score, Some(91.0));
    assert_eq!(status.documents[1].doc_type, "Income Certificate");
    assert_eq!(status.documents[1].filename, "income.jpg");
    assert_eq!(status.documents[1].verification_status, VerificationStatus::Pending);
}

#[test]
fn test_request_queue_row_falls_back_to_id() {
    let row = json!({
        "id": 88,
        "title": "Transfer certificate",
        "request_type": "certificate",
        "status": "under_review",
        "created_at": "2024-05-30T09:12:00"
    });

    let item = ReviewItem::from_row(QueueKind::Requests, row).unwrap();
    assert_eq!(item.id, "88");
    assert_eq!(item.reference, "88");
    assert_eq!(item.status, RequestStatus::InProgress);
    assert_eq!(item.submitted_date.as_deref(), Some("2024-05-30T09:12:00"));
}

#[test]
fn test_memo_row_accepts_plain_id() {
    let row = json!({
        "id": "m-3",
        "memo_id": "MC-2024-U-003",
        "semester": "6",
        "academic_year": "2024-25",
        "status": "approved",
        "document_path": "/uploads/memo/m-3.pdf",
        "student_name": "Asha Rao"
    });

    let item = ReviewItem::from_row(QueueKind::MemoCards, row).unwrap();
    assert_eq!(item.id, "m-3");
    assert_eq!(item.title, "Memo card - 6 (2024-25)");
    assert_eq!(item.documents_count, Some(1));
    assert_eq!(item.raw["student_name"], "Asha Rao");
}

#[test]
fn test_notification_aliases() {
    let body = json!({
        "id": 3,
        "title": "Document verified",
        "message": "Your ID Proof was verified",
        "type": "verification",
        "is_read": false,
        "request_id": 42,
        "created_at": "2024-06-01T10:00:00"
    });

    let n: Notification = serde_json::from_value(body).unwrap();
    assert_eq!(n.notification_type.as_deref(), Some("verification"));
    assert_eq!(n.request_id.as_deref(), Some("42"));
    assert_eq!(n.sent_at.as_deref(), Some("2024-06-01T10:00:00"));
}
