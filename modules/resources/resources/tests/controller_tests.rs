#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the generic list controller

mod common;

use std::sync::Arc;

use common::{harness, ids};
use resources::domain::LoadState;
use resources_sdk::{
    Category, CreateRequest, CustomOrder, CustomOrderStatus, CustomOrderStatusPatch, Employee,
    ImageFile, ImageSlot, Item, ItemImages, NewItem, ResourceError, ResourceId, ResourceKind,
    Ticket, TicketReplyPatch,
};
use serde_json::json;

fn custom_orders() -> Vec<serde_json::Value> {
    vec![
        json!({"id": 1, "productName": "Parcel A", "orderStatus": "Pending"}),
        json!({"id": 2, "productName": "Box", "orderStatus": "Pending"}),
    ]
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_load_enters_ready_with_full_view() {
    let h = harness::<CustomOrder>(custom_orders());
    assert_eq!(h.controller.state(), LoadState::Idle);

    h.controller.load().await.unwrap();

    let snap = h.controller.snapshot();
    assert_eq!(snap.state, LoadState::Ready);
    assert_eq!(snap.items.len(), 2);
    assert_eq!(snap.view, snap.items);
    assert!(snap.filter.is_empty());
}

#[tokio::test]
async fn test_employees_sorted_ascending_by_id() {
    let h = harness::<Employee>(vec![
        json!({"id": 30, "name": "C"}),
        json!({"id": 4, "name": "A"}),
        json!({"id": 12, "name": "B"}),
    ]);
    h.controller.load().await.unwrap();
    assert_eq!(
        ids(&h.controller.view()),
        [4, 12, 30].map(ResourceId::from).to_vec()
    );
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_collection() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();

    h.gateway
        .fail_next("list", ResourceError::network("connection refused"));
    let err = h.controller.load().await.unwrap_err();

    assert!(err.is_network());
    let snap = h.controller.snapshot();
    assert!(matches!(snap.state, LoadState::Failed(ResourceError::NetworkUnavailable { .. })));
    assert_eq!(snap.items.len(), 2, "previous collection must stay visible");
    assert_eq!(snap.last_error, Some(err));
    assert_eq!(h.notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_reload_is_stable_against_unchanged_backend() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    h.controller.search("box");
    let first = h.controller.view();

    h.controller.load().await.unwrap();
    h.controller.search("box");
    assert_eq!(h.controller.view(), first);
}

#[tokio::test]
async fn test_load_resets_filter_and_drops_vanished_selection() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    h.controller.search("box");
    h.controller.select(&ResourceId::from(2)).unwrap();

    h.gateway.set_items(ResourceKind::CustomOrders, vec![custom_orders()[0].clone()]);
    h.controller.load().await.unwrap();

    let snap = h.controller.snapshot();
    assert!(snap.filter.is_empty());
    assert_eq!(snap.view.len(), 1);
    assert!(snap.selection.is_none());
}

#[tokio::test]
async fn test_malformed_element_fails_load() {
    let h = harness::<CustomOrder>(vec![json!({"id": 1}), json!({"productName": "no id"})]);
    let err = h.controller.load().await.unwrap_err();
    assert!(matches!(err, ResourceError::MalformedResponse { .. }));
    assert!(matches!(h.controller.state(), LoadState::Failed(_)));
}

#[tokio::test]
async fn test_superseded_load_is_ignored() {
    let h = harness::<CustomOrder>(custom_orders());
    let gate = h.gateway.hold("list");

    let slow = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.load().await })
    };
    tokio::task::yield_now().await;
    while h.gateway.call_count("list") == 0 {
        tokio::task::yield_now().await;
    }

    h.gateway.set_items(ResourceKind::CustomOrders, vec![custom_orders()[1].clone()]);
    h.controller.load().await.unwrap();
    h.gateway.set_items(ResourceKind::CustomOrders, custom_orders());

    gate.notify_one();
    slow.await.unwrap().unwrap();

    // The first load read the store after the second load finished but still
    // must not overwrite the newer result.
    assert_eq!(ids(&h.controller.items()), vec![ResourceId::from(2)]);
    assert_eq!(h.controller.state(), LoadState::Ready);
}

// =============================================================================
// Filtering and selection
// =============================================================================

#[tokio::test]
async fn test_filter_by_name_field() {
    let h = harness::<Item>(vec![
        json!({"id": 1, "name": "Parcel A"}),
        json!({"id": 2, "name": "Box"}),
    ]);
    h.controller.load().await.unwrap();

    h.controller.set_filter("par", &["name"]);
    assert_eq!(ids(&h.controller.view()), vec![ResourceId::from(1)]);
    assert_eq!(h.controller.items().len(), 2, "filtering never touches the collection");

    h.controller.set_filter("  ", &["name"]);
    assert_eq!(h.controller.view().len(), 2);
}

#[tokio::test]
async fn test_select_unknown_id_is_not_found() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();

    let err = h.controller.select(&ResourceId::from(99)).unwrap_err();
    assert_eq!(
        err,
        ResourceError::not_found(ResourceKind::CustomOrders, ResourceId::from(99))
    );
    assert!(h.controller.snapshot().selection.is_none());

    let picked = h.controller.select(&ResourceId::from(2)).unwrap();
    assert_eq!(picked.product_name, "Box");
    h.controller.clear_selection();
    assert!(h.controller.snapshot().selection.is_none());
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn test_mutate_replaces_item_with_server_copy() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    h.controller.select(&ResourceId::from(1)).unwrap();

    let patch = CustomOrderStatusPatch {
        order_status: CustomOrderStatus::Approve,
    };
    let updated = h.controller.mutate(&ResourceId::from(1), &patch).await.unwrap();
    assert_eq!(updated.order_status, CustomOrderStatus::Approve);

    let statuses: Vec<CustomOrderStatus> = h
        .controller
        .items()
        .into_iter()
        .map(|o| o.order_status)
        .collect();
    assert_eq!(
        statuses,
        [CustomOrderStatus::Approve, CustomOrderStatus::Pending]
    );
    assert_eq!(h.controller.view()[0].order_status, CustomOrderStatus::Approve);
    assert_eq!(
        h.controller.snapshot().selection.unwrap().order_status,
        CustomOrderStatus::Approve
    );
    assert_eq!(h.notifier.successes().len(), 1);
}

#[tokio::test]
async fn test_failed_mutation_leaves_state_untouched() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    let before = h.controller.items();

    h.gateway
        .fail_next("update", ResourceError::rejected(500, "boom"));
    let patch = CustomOrderStatusPatch {
        order_status: CustomOrderStatus::Hold,
    };
    let err = h.controller.mutate(&ResourceId::from(2), &patch).await.unwrap_err();

    assert_eq!(err, ResourceError::rejected(500, "boom"));
    assert_eq!(h.controller.items(), before);
    assert_eq!(h.notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_concurrent_mutation_of_same_item_rejected() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    let gate = h.gateway.hold("update");

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move {
            let patch = CustomOrderStatusPatch {
                order_status: CustomOrderStatus::Processing,
            };
            controller.mutate(&ResourceId::from(1), &patch).await
        })
    };
    while h.gateway.call_count("update") == 0 {
        tokio::task::yield_now().await;
    }

    let patch = CustomOrderStatusPatch {
        order_status: CustomOrderStatus::Reject,
    };
    let err = h.controller.mutate(&ResourceId::from(1), &patch).await.unwrap_err();
    assert_eq!(
        err,
        ResourceError::ConcurrentMutation {
            id: ResourceId::from(1)
        }
    );
    assert_eq!(h.gateway.call_count("update"), 1, "second call never reached the server");

    // A different identity is not blocked.
    h.controller
        .mutate(&ResourceId::from(2), &patch)
        .await
        .unwrap();

    gate.notify_one();
    let done = first.await.unwrap().unwrap();
    assert_eq!(done.order_status, CustomOrderStatus::Processing);

    // The guard is released once the first call completes.
    h.controller
        .mutate(&ResourceId::from(1), &patch)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_mutate_unknown_id_sends_nothing() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    let patch = CustomOrderStatusPatch {
        order_status: CustomOrderStatus::Hold,
    };
    let err = h.controller.mutate(&ResourceId::from(77), &patch).await.unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { .. }));
    assert_eq!(h.gateway.call_count("update"), 0);
}

#[tokio::test]
async fn test_invalid_patch_is_rejected_locally() {
    let h = harness::<Ticket>(vec![json!({"id": 5, "subject": "Late", "replied": false})]);
    h.controller.load().await.unwrap();
    let patch = TicketReplyPatch {
        reply: "   ".to_owned(),
    };
    let err = h.controller.mutate(&ResourceId::from(5), &patch).await.unwrap_err();
    assert!(matches!(err, ResourceError::ValidationFailed { .. }));
    assert_eq!(h.gateway.call_count("update"), 0);
}

#[tokio::test]
async fn test_remove_clears_matching_selection() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    h.controller.select(&ResourceId::from(1)).unwrap();

    h.controller.remove_item(&ResourceId::from(1)).await.unwrap();

    let snap = h.controller.snapshot();
    assert_eq!(ids(&snap.items), vec![ResourceId::from(2)]);
    assert_eq!(ids(&snap.view), vec![ResourceId::from(2)]);
    assert!(snap.selection.is_none());
}

#[tokio::test]
async fn test_remove_keeps_unrelated_selection() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    h.controller.select(&ResourceId::from(2)).unwrap();

    h.controller.remove_item(&ResourceId::from(1)).await.unwrap();
    assert_eq!(h.controller.snapshot().selection.unwrap().id, 2);
}

#[tokio::test]
async fn test_failed_remove_keeps_item() {
    let h = harness::<CustomOrder>(custom_orders());
    h.controller.load().await.unwrap();
    h.gateway
        .fail_next("remove", ResourceError::network("timed out"));
    assert!(h.controller.remove_item(&ResourceId::from(1)).await.is_err());
    assert_eq!(h.controller.items().len(), 2);
}

#[tokio::test]
async fn test_create_appends_server_item() {
    let h = harness::<Item>(vec![json!({"id": 1, "name": "Box"})]);
    h.controller.load().await.unwrap();

    let new_item = NewItem {
        name: "Tape".to_owned(),
        price: Some(2.5),
        quantity: Some(10),
        ..NewItem::default()
    };
    let mut images = ItemImages::default();
    images.set(
        ImageSlot::Image1,
        ImageFile {
            file_name: "tape.png".to_owned(),
            content_type: Some("image/png".to_owned()),
            bytes: vec![0x89, 0x50],
        },
    );
    let request = CreateRequest::new_item(&new_item, images).unwrap();
    assert_eq!(request.attachments[0].field, "image1");

    let created = h.controller.create(request).await.unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(
        ids(&h.controller.view()),
        vec![ResourceId::from(1), ResourceId::from(2)]
    );
}

#[tokio::test]
async fn test_create_category_takes_server_identity() {
    let h = harness::<Category>(vec![json!({"id": 5, "category": "Tools"})]);
    h.controller.load().await.unwrap();
    let created = h
        .controller
        .create(CreateRequest {
            payload: json!({"category": "Garden"}),
            attachments: Vec::new(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, Some(ResourceId::from(6)));
    assert_eq!(h.controller.items().len(), 2);
}

#[tokio::test]
async fn test_refresh_one_reconciles_item() {
    let h = harness::<Employee>(vec![json!({"id": 1, "name": "Ana"})]);
    h.controller.load().await.unwrap();
    h.gateway
        .set_items(ResourceKind::Employees, vec![json!({"id": 1, "name": "Ana Ruiz"})]);

    let fresh = h.controller.refresh_one(&ResourceId::from(1)).await.unwrap();
    assert_eq!(fresh.name, "Ana Ruiz");
    assert_eq!(h.controller.items()[0].name, "Ana Ruiz");
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn test_late_load_after_teardown_is_dropped() {
    let h = harness::<CustomOrder>(custom_orders());
    let gate = h.gateway.hold("list");
    let pending = {
        let controller = Arc::clone(&h.controller);
        tokio::spawn(async move { controller.load().await })
    };
    while h.gateway.call_count("list") == 0 {
        tokio::task::yield_now().await;
    }

    h.controller.teardown();
    gate.notify_one();
    pending.await.unwrap().unwrap();

    assert!(h.controller.items().is_empty());
    assert_eq!(h.controller.state(), LoadState::Idle);
    assert!(h.notifier.errors().is_empty());
}
