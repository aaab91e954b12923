#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the session context

mod common;

use common::{FakeGateway, FakeSessions, secret};
use resources::domain::SessionContext;
use resources_sdk::{Credentials, ProfilePatch, ResourceError, ResourceKind};
use serde_json::json;

fn profile(name: &str) -> ProfilePatch {
    ProfilePatch {
        name: name.to_owned(),
        email: "sam@depot.example".to_owned(),
        country: "Peru".to_owned(),
        contactno: 5_550_100,
        address: "1 Dock Rd".to_owned(),
        image_base64: String::new(),
    }
}

#[tokio::test]
async fn test_login_stores_token_and_user() {
    let sessions = FakeSessions::accepting(json!({"id": 3, "name": "Sam", "role": "Admin"}));
    let ctx = SessionContext::new();

    let user = ctx
        .login(&sessions, &Credentials::new("sam@depot.example", secret("pw")))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.id, 3);
    assert!(ctx.is_authenticated());
    assert_eq!(ctx.token().unwrap().expose(), "tok-123");
    assert_eq!(ctx.user().unwrap().role.as_deref(), Some("Admin"));
}

#[tokio::test]
async fn test_blank_credentials_are_not_sent() {
    let sessions = FakeSessions::accepting(json!({"id": 3}));
    let ctx = SessionContext::new();
    let err = ctx
        .login(&sessions, &Credentials::new("  ", secret("pw")))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::ValidationFailed { .. }));
    assert!(sessions.logins.lock().is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let sessions = FakeSessions::rejecting(401, "Invalid credentials");
    let ctx = SessionContext::with_token(secret("old"));
    let err = ctx
        .login(&sessions, &Credentials::new("sam@depot.example", secret("bad")))
        .await
        .unwrap_err();
    assert_eq!(err, ResourceError::rejected(401, "Invalid credentials"));
    assert_eq!(ctx.token().unwrap().expose(), "old");
}

#[tokio::test]
async fn test_profile_update_needs_session() {
    let gateway = FakeGateway::new();
    let ctx = SessionContext::new();
    let err = ctx
        .update_profile(&*gateway, 3, &profile("Sam"))
        .await
        .unwrap_err();
    assert_eq!(err, ResourceError::Unauthenticated);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_profile_update_replaces_own_user_data() {
    let gateway = FakeGateway::new();
    gateway.set_items(
        ResourceKind::Employees,
        vec![
            json!({"id": 3, "name": "Sam", "email": "sam@depot.example"}),
            json!({"id": 4, "name": "Kim", "email": "kim@depot.example"}),
        ],
    );
    let sessions = FakeSessions::accepting(json!({"id": 3, "name": "Sam"}));
    let ctx = SessionContext::new();
    ctx.login(&sessions, &Credentials::new("sam@depot.example", secret("pw")))
        .await
        .unwrap();

    let updated = ctx
        .update_profile(&*gateway, 3, &profile("Samuel"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Samuel");
    assert_eq!(ctx.user().unwrap().name, "Samuel");
    assert_eq!(ctx.user().unwrap().country.as_deref(), Some("Peru"));

    // Editing someone else leaves the stored profile alone.
    ctx.update_profile(&*gateway, 4, &profile("Kimberly"))
        .await
        .unwrap();
    assert_eq!(ctx.user().unwrap().name, "Samuel");
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let sessions = FakeSessions::accepting(json!({"id": 3}));
    let ctx = SessionContext::new();
    ctx.login(&sessions, &Credentials::new("sam@depot.example", secret("pw")))
        .await
        .unwrap();
    ctx.logout();
    assert!(!ctx.is_authenticated());
    assert!(ctx.user().is_none());
}
