mod common;

use serde_json::json;

use common::*;
use mavigo_core::error::LINK_GOOGLE_TASKS_MESSAGE;
use mavigo_core::models::TaskList;
use mavigo_core::tasks::TaskForm;
use mavigo_core::{ErrorContext, MavigoError, Method, StateHandle, View};

const DEFAULT_LIST: &str = "/api/google/tasks/users/u1/default-list";
const TASKS: &str = "/api/google/tasks/users/u1/lists/l1/tasks";

fn with_default_list(client: &TestClient) {
    backend(client).on(Method::Get, DEFAULT_LIST, 200, json!({"id": "l1", "title": "My Tasks"}));
}

#[tokio::test]
async fn test_create_then_reload_lists_new_task_once_and_clears_form() {
    let client = client();
    let state = logged_in(true);
    state.update(|s| {
        s.default_task_list = Some(TaskList {
            id: "l1".into(),
            title: "My Tasks".into(),
        })
    });
    backend(&client)
        .on(Method::Post, TASKS, 201, json!({"id": "t2", "title": "Buy stamps"}))
        .on(
            Method::Get,
            TASKS,
            200,
            json!([{"id": "t1", "title": "Milk"}, {"id": "t2", "title": "Buy stamps"}]),
        );

    let mut form = TaskForm {
        title: "Buy stamps".into(),
        location_hint: "La Poste".into(),
        ..TaskForm::default()
    };
    let created = client.create_task(&state, &mut form).await.unwrap();

    assert_eq!(created.id, "t2");
    assert_eq!(form, TaskForm::default());
    let tasks = state.read(|s| s.tasks.clone());
    assert_eq!(tasks.iter().filter(|t| t.id == "t2").count(), 1);
    assert_eq!(tasks.len(), 2);
    // cached list, no lookup
    assert_eq!(backend(&client).calls(Method::Get, DEFAULT_LIST), 0);

    let body = backend(&client).bodies(Method::Post, TASKS)[0].clone().unwrap();
    assert_eq!(body, json!({"title": "Buy stamps", "locationHint": "La Poste"}));
}

#[tokio::test]
async fn test_created_task_kept_when_reload_fails() {
    let client = client();
    let state = logged_in(true);
    with_default_list(&client);
    backend(&client)
        .on(Method::Post, TASKS, 201, json!({"id": "t2", "title": "Buy stamps"}))
        .on_text(Method::Get, TASKS, 500, "boom");

    let mut form = TaskForm {
        title: "Buy stamps".into(),
        ..TaskForm::default()
    };
    client.create_task(&state, &mut form).await.unwrap();
    assert_eq!(state.read(|s| s.tasks.len()), 1);
}

#[tokio::test]
async fn test_blank_title_is_rejected_locally() {
    let client = client();
    let state = logged_in(true);
    let mut form = TaskForm::default();

    let err = client.create_task(&state, &mut form).await.unwrap_err();
    assert!(matches!(err, MavigoError::Validation(_)));
    assert!(backend(&client).requests().is_empty());
}

#[tokio::test]
async fn test_default_list_is_cached_until_forced() {
    let client = client();
    let state = logged_in(true);
    with_default_list(&client);
    backend(&client).on(Method::Get, TASKS, 200, json!([]));

    client.reload_tasks(&state, false).await.unwrap();
    client.reload_tasks(&state, false).await.unwrap();
    assert_eq!(backend(&client).calls(Method::Get, DEFAULT_LIST), 1);

    client.reload_tasks(&state, true).await.unwrap();
    assert_eq!(backend(&client).calls(Method::Get, DEFAULT_LIST), 2);
}

#[tokio::test]
async fn test_auth_class_statuses_all_mean_link_required() {
    for status in [401, 403, 409] {
        let client = client();
        let state = logged_in(true);
        backend(&client).on_text(Method::Get, DEFAULT_LIST, status, "Google token revoked");

        let err = client.reload_tasks(&state, false).await.unwrap_err();

        assert!(err.is_auth_required());
        assert_eq!(err.user_message(ErrorContext::Tasks), LINK_GOOGLE_TASKS_MESSAGE);
        assert!(state.read(|s| s.link_required));
    }
}

#[tokio::test]
async fn test_auth_failure_on_task_mutation_sets_link_required() {
    let client = client();
    let state = logged_in(true);
    with_default_list(&client);
    backend(&client).on_text(Method::Delete, &format!("{}/t1", TASKS), 403, "forbidden");

    let err = client.delete_task(&state, "t1").await.unwrap_err();
    assert_eq!(err.user_message(ErrorContext::Tasks), LINK_GOOGLE_TASKS_MESSAGE);
    assert!(state.read(|s| s.link_required));
}

#[tokio::test]
async fn test_generic_failure_is_not_link_required() {
    let client = client();
    let state = logged_in(true);
    with_default_list(&client);
    backend(&client).on_text(Method::Get, TASKS, 500, "Tasks API unavailable");

    let err = client.reload_tasks(&state, false).await.unwrap_err();
    assert_eq!(err.user_message(ErrorContext::Tasks), "Tasks API unavailable");
    assert!(!state.read(|s| s.link_required));
}

#[tokio::test]
async fn test_unlinked_user_never_calls_proxy() {
    let client = client();
    let state = logged_in(false);

    let err = client.reload_tasks(&state, false).await.unwrap_err();
    assert_eq!(err, MavigoError::NotLinked);
    assert_eq!(err.user_message(ErrorContext::Tasks), LINK_GOOGLE_TASKS_MESSAGE);
    assert!(backend(&client).requests().is_empty());
}

#[tokio::test]
async fn test_complete_and_delete_update_cache() {
    let client = client();
    let state = logged_in(true);
    with_default_list(&client);
    backend(&client)
        .on(Method::Get, TASKS, 200, json!([{"id": "t1", "title": "Milk"}, {"id": "t2", "title": "Bread"}]))
        .on(Method::Post, &format!("{}/t1/complete", TASKS), 204, json!(null))
        .on(Method::Delete, &format!("{}/t2", TASKS), 204, json!(null));

    client.reload_tasks(&state, false).await.unwrap();
    client.complete_task(&state, "t1").await.unwrap();
    client.delete_task(&state, "t2").await.unwrap();

    let tasks = state.read(|s| s.tasks.clone());
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].is_completed());
}

#[tokio::test]
async fn test_entering_tasks_view_reloads() {
    let client = client();
    let state = logged_in(true);
    with_default_list(&client);
    backend(&client).on(Method::Get, TASKS, 200, json!([{"id": "t1", "title": "Milk"}]));

    client.enter_view(&state, View::Tasks).await;

    assert_eq!(state.read(|s| s.view), View::Tasks);
    assert_eq!(state.read(|s| s.tasks.len()), 1);
    assert_eq!(client.settings().last_view(), Some(View::Tasks));
}

#[tokio::test]
async fn test_entering_tasks_view_when_unlinked_skips_refresh() {
    let client = client();
    let state = logged_in(false);

    client.enter_view(&state, View::Tasks).await;

    assert_eq!(state.read(|s| s.view), View::Tasks);
    assert!(backend(&client).requests().is_empty());
}

#[tokio::test]
async fn test_suggestions_hide_dismissed() {
    let client = client();
    let state = logged_in(true);
    let path = "/api/google/tasks/users/u1/suggestions?date=2025-03-01";
    backend(&client).on(
        Method::Get,
        path,
        200,
        json!([{"taskId": "t1", "title": "Parcel"}, {"taskId": "t2", "title": "Pharmacy"}]),
    );
    let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    assert_eq!(client.load_suggestions(&state, date).await.unwrap().len(), 2);
    client.dismiss_suggestion(&state, "t1");
    let visible = client.load_suggestions(&state, date).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].task_id, "t2");
}
