mod common;

use campus_application::{ReviewDetails, ReviewQueue};
use campus_core::PortalError;
use campus_core::request::RequestStatus;
use campus_core::review::{QueueKind, ReviewAction, StatusTab};
use common::{MockPortalApi, queue_item};
use std::sync::Arc;
use std::time::Duration;

fn seeded(api: &MockPortalApi) {
    *api.queue.lock().unwrap() = vec![
        queue_item("1", RequestStatus::Pending),
        queue_item("2", RequestStatus::InProgress),
        queue_item("3", RequestStatus::Approved),
        queue_item("4", RequestStatus::Rejected),
        queue_item("5", RequestStatus::Pending),
    ];
}

#[tokio::test]
async fn test_tabs_filter_client_side() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::Requests);
    queue.load().await.unwrap();

    assert_eq!(queue.visible().len(), 3);
    queue.set_tab(StatusTab::Approved);
    assert_eq!(queue.visible().len(), 1);
    queue.set_tab(StatusTab::All);
    assert_eq!(queue.visible().len(), 5);
    assert_eq!(queue.count_for(StatusTab::Rejected), 1);
    assert_eq!(api.count("list_review_queue"), 1);
}

#[tokio::test]
async fn test_decide_reloads() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::Scholarships);
    queue.load().await.unwrap();

    queue
        .decide("1", ReviewAction::PendingApproval, Some("Upload a clearer ID".into()))
        .await
        .unwrap();

    assert_eq!(api.count("list_review_queue"), 2);
    assert_eq!(queue.item("1").unwrap().status, RequestStatus::NeedsAction);
    let decisions = api.decisions.lock().unwrap();
    assert_eq!(decisions[0].1.comments.as_deref(), Some("Upload a clearer ID"));
}

#[tokio::test]
async fn test_memo_cards_reject_more_info_locally() {
    let api = Arc::new(MockPortalApi::new());
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::MemoCards);

    let err = queue
        .decide("65f0", ReviewAction::PendingApproval, None)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(api.count("submit_review"), 0);
}

#[tokio::test]
async fn test_bulk_approve_clears_selection_on_success() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::Requests);
    queue.load().await.unwrap();

    queue.select_all_visible();
    assert_eq!(queue.selected().len(), 3);

    let outcome = queue.bulk_decide(ReviewAction::Approved, None).await.unwrap();
    assert!(outcome.is_clean());
    assert_eq!(outcome.succeeded.len(), 3);
    assert!(queue.selected().is_empty());
    assert!(queue.visible().is_empty());
}

#[tokio::test]
async fn test_bulk_approve_clears_selection_on_failure() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::Requests);
    queue.load().await.unwrap();

    queue.toggle("1");
    queue.toggle("2");
    api.failing_ids.lock().unwrap().insert("2".to_string());

    let outcome = queue.bulk_decide(ReviewAction::Approved, None).await.unwrap();
    assert_eq!(outcome.succeeded, vec!["1".to_string()]);
    assert_eq!(outcome.failed.len(), 1);
    assert!(queue.selected().is_empty());
    assert!(queue.error().unwrap().starts_with("1 of 2 item(s) failed"));
}

#[tokio::test]
async fn test_bulk_clears_selection_when_backend_is_down() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::BusPasses);
    queue.load().await.unwrap();
    queue.toggle("1");
    queue.toggle("5");

    api.set_failure(Some(PortalError::Network("connection refused".into())));
    let outcome = queue.bulk_decide(ReviewAction::Rejected, None).await.unwrap();

    assert_eq!(outcome.failed.len(), 2);
    assert!(queue.selected().is_empty());
}

#[tokio::test]
async fn test_toggle_twice_deselects() {
    let api = Arc::new(MockPortalApi::new());
    let mut queue = ReviewQueue::new(api, QueueKind::Requests);
    queue.toggle("9");
    assert!(queue.is_selected("9"));
    queue.toggle("9");
    assert!(!queue.is_selected("9"));
}

#[tokio::test]
async fn test_details_per_kind() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);

    let scholarships = ReviewQueue::new(api.clone(), QueueKind::Scholarships);
    match scholarships.view_details("1").await.unwrap() {
        ReviewDetails::Verification(report) => assert_eq!(report.overall_score, Some(87.5)),
        other => panic!("unexpected details: {other:?}"),
    }

    let mut buses = ReviewQueue::new(api.clone(), QueueKind::BusPasses);
    buses.load().await.unwrap();
    assert!(matches!(
        buses.view_details("3").await.unwrap(),
        ReviewDetails::Row(item) if item.id == "3"
    ));
    assert!(buses.view_details("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_bulk_unsupported_action_keeps_selection() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::MemoCards);
    queue.load().await.unwrap();
    queue.toggle("1");
    queue.toggle("5");

    let err = queue
        .bulk_decide(ReviewAction::PendingApproval, None)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(queue.selected().len(), 2);
    assert!(queue.is_selected("1"));
    assert!(queue.is_selected("5"));
    assert_eq!(api.count("submit_review"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_load_recovers_after_timeout() {
    let api = Arc::new(MockPortalApi::new());
    seeded(&api);
    let mut queue = ReviewQueue::new(api.clone(), QueueKind::Requests);

    api.set_hanging("list_review_queue", true);
    assert!(tokio::time::timeout(Duration::from_secs(30), queue.load()).await.is_err());
    assert!(!queue.is_loading());

    api.set_hanging("list_review_queue", false);
    queue.load().await.unwrap();
    assert_eq!(queue.count_for(StatusTab::All), 5);
}
