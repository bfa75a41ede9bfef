mod common;

use std::cell::RefCell;

use serde_json::json;

use common::*;
use mavigo_core::models::RegisterForm;
use mavigo_core::settings::Setting;
use mavigo_core::{AppState, MavigoError, Method, SettingsStore, StateHandle, View};

#[tokio::test]
async fn test_login_persists_credentials_and_opens_tasks() {
    let client = client();
    backend(&client).on(
        Method::Post,
        "/api/users/login",
        200,
        json!({"user": user_json("u1", true), "token": "tok-1"}),
    );
    let state = RefCell::new(AppState::default());

    let user = client
        .login(&state, " ada@example.org ", "secret")
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(
        client.settings().credentials(),
        Some(("u1".to_string(), "tok-1".to_string()))
    );
    assert_eq!(client.settings().last_view(), Some(View::Tasks));
    assert_eq!(state.read(|s| s.view), View::Tasks);
    assert_eq!(client.api().token().as_deref(), Some("tok-1"));

    let body = backend(&client).bodies(Method::Post, "/api/users/login")[0].clone();
    assert_eq!(body, Some(json!({"email": "ada@example.org", "password": "secret"})));
}

#[tokio::test]
async fn test_missing_fields_never_reach_the_network() {
    let client = client();
    let state = RefCell::new(AppState::default());

    let err = client.login(&state, "", "secret").await.unwrap_err();
    assert!(matches!(err, MavigoError::Validation(_)));

    let form = RegisterForm {
        email: "ada@example.org".into(),
        password: "secret".into(),
        ..RegisterForm::default()
    };
    assert!(client.register(&state, &form).await.is_err());
    assert!(backend(&client).requests().is_empty());
}

#[tokio::test]
async fn test_login_failure_surfaces_body() {
    let client = client();
    backend(&client).on_text(Method::Post, "/api/users/login", 400, "Invalid credentials");
    let state = RefCell::new(AppState::default());

    let err = client.login(&state, "a@b.c", "x").await.unwrap_err();
    assert_eq!(err.to_string(), "request failed with status 400: Invalid credentials");
    assert!(state.read(|s| s.user.is_none()));
    assert_eq!(client.settings().credentials(), None);
}

#[tokio::test]
async fn test_register_sends_trimmed_form() {
    let client = client();
    backend(&client).on(
        Method::Post,
        "/api/users",
        201,
        json!({"user": user_json("u9", false), "token": "tok-9"}),
    );
    let state = RefCell::new(AppState::default());
    let form = RegisterForm {
        display_name: " Ada ".into(),
        email: "ada@example.org".into(),
        password: "secret".into(),
        home_address: Some("   ".into()),
    };

    client.register(&state, &form).await.unwrap();

    let body = backend(&client).bodies(Method::Post, "/api/users")[0]
        .clone()
        .unwrap();
    assert_eq!(body["displayName"], "Ada");
    assert!(body.get("homeAddress").is_none());
    assert_eq!(state.read(|s| s.user_id().map(str::to_string)), Some("u9".into()));
}

#[tokio::test]
async fn test_restore_fetches_user_with_stored_token() {
    let client = client_with(&[(Setting::UserId, "u1"), (Setting::AuthToken, "tok")]);
    backend(&client).on(Method::Get, "/api/users/u1", 200, user_json("u1", true));
    let state = RefCell::new(AppState::default());

    let user = client.restore_session(&state).await.unwrap();
    assert_eq!(user.email, "ada@example.org");
    assert_eq!(
        backend(&client).requests()[0].bearer.as_deref(),
        Some("tok")
    );
}

#[tokio::test]
async fn test_restore_without_token_stays_logged_out() {
    let client = client_with(&[(Setting::UserId, "u1")]);
    let state = RefCell::new(AppState::default());

    assert!(client.restore_session(&state).await.is_none());
    assert!(backend(&client).requests().is_empty());
}

#[tokio::test]
async fn test_restore_auth_failure_discards_token() {
    let client = client_with(&[(Setting::UserId, "u1"), (Setting::AuthToken, "stale")]);
    backend(&client).on_text(Method::Get, "/api/users/u1", 401, "expired");
    let state = RefCell::new(AppState::default());

    assert!(client.restore_session(&state).await.is_none());
    assert_eq!(client.settings().credentials(), None);
    assert_eq!(
        client.settings().store().get(Setting::UserId.key()),
        Some("u1".to_string())
    );
    assert!(client.api().token().is_none());
}

#[tokio::test]
async fn test_restore_other_failure_keeps_token() {
    let client = client_with(&[(Setting::UserId, "u1"), (Setting::AuthToken, "tok")]);
    backend(&client).on_text(Method::Get, "/api/users/u1", 503, "maintenance");
    let state = RefCell::new(AppState::default());

    assert!(client.restore_session(&state).await.is_none());
    assert!(client.settings().credentials().is_some());
    assert!(state.read(|s| s.user.is_none()));
}

#[tokio::test]
async fn test_logout_clears_session_state() {
    let client = client_with(&[(Setting::UserId, "u1"), (Setting::AuthToken, "tok")]);
    let state = logged_in(true);
    state.update(|s| {
        s.view = View::EcoScore;
        s.link_required = true;
        s.set_current_journey(Some(journey("j1", "IN_PROGRESS")));
    });

    client.logout(&state);

    assert_eq!(state.snapshot(), AppState::default());
    assert_eq!(client.settings().credentials(), None);
    assert_eq!(client.settings().last_view(), Some(View::Journey));
}

#[tokio::test]
async fn test_refresh_user_requires_session() {
    let client = client();
    let state = RefCell::new(AppState::default());
    assert_eq!(
        client.refresh_user(&state).await.unwrap_err(),
        MavigoError::NotLoggedIn
    );
}
