#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the detail presenter and its drafts

mod common;

use common::harness;
use resources::domain::{
    ApprovalDraft, CustomOrderStatusDraft, DetailPresenter, NoDraft, ReplyDraft,
};
use resources_sdk::{
    CustomOrder, CustomOrderStatus, Employee, ResourceError, ResourceId, ResourceKind, Ticket,
};
use serde_json::json;

// =============================================================================
// Commit
// =============================================================================

#[tokio::test]
async fn test_approval_commit_closes_on_success() {
    let h = harness::<Employee>(vec![
        json!({"id": 1, "name": "Ana", "status": "Pending"}),
        json!({"id": 2, "name": "Bo", "status": "Approved", "role": "Manager", "salary": 9000.0}),
    ]);
    h.controller.load().await.unwrap();

    let mut presenter: DetailPresenter<Employee, ApprovalDraft> =
        DetailPresenter::new(h.controller.clone());
    presenter.open(&ResourceId::from(1)).unwrap();
    assert!(presenter.is_open());
    assert_eq!(presenter.draft().role, "Employee");

    presenter.draft_mut().salary = "4200".to_owned();
    let updated = presenter.commit().await.unwrap();

    assert_eq!(updated.status.as_deref(), Some("Approved"));
    assert_eq!(updated.role.as_deref(), Some("Employee"));
    assert!(!presenter.is_open());
    assert!(presenter.error().is_none());
    assert_eq!(
        h.controller.get(&ResourceId::from(1)).unwrap().status.as_deref(),
        Some("Approved")
    );
    assert!(h.gateway.calls().contains(&"update employees 1 approve".to_owned()));
}

#[tokio::test]
async fn test_open_seeds_draft_from_item() {
    let h = harness::<Employee>(vec![
        json!({"id": 2, "name": "Bo", "role": "Manager", "salary": 9000.0}),
    ]);
    h.controller.load().await.unwrap();

    let mut presenter: DetailPresenter<Employee, ApprovalDraft> =
        DetailPresenter::new(h.controller.clone());
    presenter.open(&ResourceId::from(2)).unwrap();
    assert_eq!(presenter.draft().role, "Manager");
    assert_eq!(presenter.draft().salary, "9000");
}

#[tokio::test]
async fn test_failed_commit_stays_open_with_draft() {
    let h = harness::<CustomOrder>(vec![json!({"id": 3, "orderStatus": "Pending"})]);
    h.controller.load().await.unwrap();

    let mut presenter: DetailPresenter<CustomOrder, CustomOrderStatusDraft> =
        DetailPresenter::new(h.controller.clone());
    presenter.open(&ResourceId::from(3)).unwrap();
    presenter.draft_mut().status = "hold".to_owned();

    h.gateway
        .fail_next("update", ResourceError::rejected(502, "Bad gateway"));
    let err = presenter.commit().await.unwrap_err();

    assert_eq!(err, ResourceError::rejected(502, "Bad gateway"));
    assert!(presenter.is_open());
    assert_eq!(presenter.error(), Some(&err));
    assert_eq!(presenter.draft().status, "hold");
    assert_eq!(
        h.controller.get(&ResourceId::from(3)).unwrap().order_status,
        CustomOrderStatus::Pending
    );

    // Retrying the same draft succeeds and closes.
    let order = presenter.commit().await.unwrap();
    assert_eq!(order.order_status, CustomOrderStatus::Hold);
    assert!(!presenter.is_open());
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_server() {
    let h = harness::<Employee>(vec![json!({"id": 1, "name": "Ana"})]);
    h.controller.load().await.unwrap();

    let mut presenter: DetailPresenter<Employee, ApprovalDraft> =
        DetailPresenter::new(h.controller.clone());
    presenter.open(&ResourceId::from(1)).unwrap();
    let err = presenter.commit().await.unwrap_err();

    assert!(matches!(err, ResourceError::ValidationFailed { ref field, .. } if field == "salary"));
    assert!(presenter.is_open());
    assert_eq!(h.gateway.call_count("update"), 0);
}

#[tokio::test]
async fn test_reply_to_closed_ticket_rejected_locally() {
    let h = harness::<Ticket>(vec![
        json!({"id": 8, "subject": "Where is my parcel", "replied": true, "reply": "Shipped"}),
    ]);
    h.controller.load().await.unwrap();

    let mut presenter: DetailPresenter<Ticket, ReplyDraft> =
        DetailPresenter::new(h.controller.clone());
    presenter.open(&ResourceId::from(8)).unwrap();
    presenter.draft_mut().reply = "Any news?".to_owned();

    assert!(presenter.commit().await.is_err());
    assert_eq!(h.gateway.call_count("update"), 0);
}

#[tokio::test]
async fn test_reply_marks_ticket_closed() {
    let h = harness::<Ticket>(vec![json!({"id": 8, "subject": "Late", "replied": false})]);
    h.controller.load().await.unwrap();

    let mut presenter: DetailPresenter<Ticket, ReplyDraft> =
        DetailPresenter::new(h.controller.clone());
    presenter.open(&ResourceId::from(8)).unwrap();
    presenter.draft_mut().reply = "  On its way  ".to_owned();
    let ticket = presenter.commit().await.unwrap();

    assert!(ticket.replied);
    assert_eq!(ticket.reply.as_deref(), Some("On its way"));
}

// =============================================================================
// Open, close and delete
// =============================================================================

#[tokio::test]
async fn test_open_unknown_id_fails() {
    let h = harness::<CustomOrder>(vec![json!({"id": 1})]);
    h.controller.load().await.unwrap();
    let mut presenter: DetailPresenter<CustomOrder> = DetailPresenter::new(h.controller.clone());

    let err = presenter.open(&ResourceId::from(5)).unwrap_err();
    assert_eq!(
        err,
        ResourceError::not_found(ResourceKind::CustomOrders, ResourceId::from(5))
    );
    assert!(!presenter.is_open());
}

#[tokio::test]
async fn test_close_clears_controller_selection() {
    let h = harness::<CustomOrder>(vec![json!({"id": 1})]);
    h.controller.load().await.unwrap();
    let mut presenter: DetailPresenter<CustomOrder, NoDraft> =
        DetailPresenter::new(h.controller.clone());

    presenter.open(&ResourceId::from(1)).unwrap();
    assert!(h.controller.snapshot().selection.is_some());
    presenter.close();
    assert!(h.controller.snapshot().selection.is_none());
}

#[tokio::test]
async fn test_delete_confirmation_removes_selection() {
    let h = harness::<CustomOrder>(vec![json!({"id": 1}), json!({"id": 2})]);
    h.controller.load().await.unwrap();
    let mut presenter: DetailPresenter<CustomOrder> = DetailPresenter::new(h.controller.clone());

    presenter.open(&ResourceId::from(2)).unwrap();
    presenter.delete().await.unwrap();

    assert!(!presenter.is_open());
    assert!(h.controller.get(&ResourceId::from(2)).is_none());
    assert!(h.controller.snapshot().selection.is_none());
    assert_eq!(h.gateway.items(ResourceKind::CustomOrders).len(), 1);
}

#[tokio::test]
async fn test_delete_without_open_item_fails() {
    let h = harness::<CustomOrder>(vec![json!({"id": 1})]);
    let mut presenter: DetailPresenter<CustomOrder> = DetailPresenter::new(h.controller.clone());
    assert!(matches!(
        presenter.delete().await,
        Err(ResourceError::NotFound { .. })
    ));
}
