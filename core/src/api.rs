//! Typed calls against the Mavigo REST API.
//!
//! The actual HTTP stack is injected through [`ApiTransport`]; this module only
//! builds requests and classifies responses.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;
use urlencoding::encode;

use crate::error::{MavigoError, Result};
use crate::models::{
    AuthResponse, ComfortProfile, ComfortSetting, DisruptionResponse, EcoDashboard,
    HomeAddressRequest, Journey, Line, LoginRequest, NewTask, PlanRequest, RegisterForm, Stop,
    Suggestion, Task, TaskList, User,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// One JSON request. Transports send `Content-Type`/`Accept: application/json`
/// and turn `bearer` into an `Authorization` header.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait ApiTransport {
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, TransportError>;
}

/// Lists come back either bare or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Many<T> {
    List(Vec<T>),
    Wrapped {
        #[serde(
            alias = "journeys",
            alias = "results",
            alias = "tasks",
            alias = "lines",
            alias = "stops",
            alias = "settings",
            alias = "suggestions"
        )]
        items: Vec<T>,
    },
}

impl<T> Many<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Many::List(items) | Many::Wrapped { items } => items,
        }
    }
}

fn users(user_id: &str) -> String {
    format!("/api/users/{}", encode(user_id))
}

fn journeys(journey_id: &str) -> String {
    format!("/api/journeys/{}", encode(journey_id))
}

fn task_user(user_id: &str) -> String {
    format!("/api/google/tasks/users/{}", encode(user_id))
}

fn list_tasks_path(user_id: &str, list_id: &str) -> String {
    format!("{}/lists/{}/tasks", task_user(user_id), encode(list_id))
}

fn task_path(user_id: &str, list_id: &str, task_id: &str) -> String {
    format!("{}/{}", list_tasks_path(user_id, list_id), encode(task_id))
}

/// Origin-relative path opened in the Google linking popup.
pub fn google_link_path(user_id: &str) -> String {
    format!("/api/google/tasks/link?userId={}", encode(user_id))
}

pub struct ApiClient<T> {
    transport: T,
    token: RwLock<Option<String>>,
}

impl<T: ApiTransport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: RwLock::new(None),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut slot = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<R> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.token(),
        };
        debug!(method = method.as_str(), path, "api request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| MavigoError::Network(e.0))?;

        if !response.is_success() {
            debug!(status = response.status, path, "api request failed");
            return Err(MavigoError::from_status(response.status, &response.body));
        }

        let text = response.body.trim();
        let text = if text.is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(|e| MavigoError::Decode(format!("{}: {}", path, e)))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.request(Method::Get, path, None).await
    }

    async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let body = serde_json::to_value(body).map_err(|e| MavigoError::Decode(e.to_string()))?;
        self.request(method, path, Some(body)).await
    }

    async fn fire(&self, method: Method, path: &str) -> Result<()> {
        self.request::<IgnoredAny>(method, path, None).await?;
        Ok(())
    }

    // -- Users --

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.send_json(Method::Post, "/api/users/login", request).await
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<AuthResponse> {
        self.send_json(Method::Post, "/api/users", form).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.get(&users(user_id)).await
    }

    pub async fn update_home_address(&self, user_id: &str, address: &str) -> Result<()> {
        let body = HomeAddressRequest {
            home_address: address.to_string(),
        };
        let path = format!("{}/home-address", users(user_id));
        self.send_json::<_, IgnoredAny>(Method::Put, &path, &body).await?;
        Ok(())
    }

    pub async fn save_comfort_profile(&self, user_id: &str, profile: &ComfortProfile) -> Result<()> {
        let path = format!("{}/comfort-profile", users(user_id));
        self.send_json::<_, IgnoredAny>(Method::Put, &path, profile).await?;
        Ok(())
    }

    pub async fn clear_comfort_profile(&self, user_id: &str) -> Result<()> {
        self.fire(Method::Delete, &format!("{}/comfort-profile", users(user_id)))
            .await
    }

    pub async fn comfort_settings(&self, user_id: &str) -> Result<Vec<ComfortSetting>> {
        let many: Many<ComfortSetting> = self
            .get(&format!("{}/comfort-settings", users(user_id)))
            .await?;
        Ok(many.into_vec())
    }

    pub async fn create_comfort_setting(
        &self,
        user_id: &str,
        setting: &ComfortSetting,
    ) -> Result<ComfortSetting> {
        let path = format!("{}/comfort-settings", users(user_id));
        self.send_json(Method::Post, &path, setting).await
    }

    pub async fn update_comfort_setting(
        &self,
        user_id: &str,
        setting_id: &str,
        setting: &ComfortSetting,
    ) -> Result<ComfortSetting> {
        let path = format!("{}/comfort-settings/{}", users(user_id), encode(setting_id));
        self.send_json(Method::Put, &path, setting).await
    }

    pub async fn delete_comfort_setting(&self, user_id: &str, setting_id: &str) -> Result<()> {
        let path = format!("{}/comfort-settings/{}", users(user_id), encode(setting_id));
        self.fire(Method::Delete, &path).await
    }

    pub async fn mark_comfort_prompt_seen(&self, user_id: &str) -> Result<()> {
        self.fire(Method::Post, &format!("{}/comfort-prompt-seen", users(user_id)))
            .await
    }

    // -- Journeys --

    pub async fn plan_journey(&self, request: &PlanRequest) -> Result<Vec<Journey>> {
        let many: Many<Journey> = self.send_json(Method::Post, "/api/journeys", request).await?;
        Ok(many.into_vec())
    }

    pub async fn start_journey(&self, journey_id: &str) -> Result<Journey> {
        self.request(Method::Post, &format!("{}/start", journeys(journey_id)), None)
            .await
    }

    pub async fn complete_journey(&self, journey_id: &str) -> Result<Journey> {
        self.request(Method::Post, &format!("{}/complete", journeys(journey_id)), None)
            .await
    }

    pub async fn cancel_journey(&self, journey_id: &str) -> Result<Journey> {
        self.request(Method::Post, &format!("{}/cancel", journeys(journey_id)), None)
            .await
    }

    pub async fn journey_lines(&self, journey_id: &str) -> Result<Vec<Line>> {
        let many: Many<Line> = self.get(&format!("{}/lines", journeys(journey_id))).await?;
        Ok(many.into_vec())
    }

    pub async fn journey_stops(&self, journey_id: &str) -> Result<Vec<Stop>> {
        let many: Many<Stop> = self.get(&format!("{}/stops", journeys(journey_id))).await?;
        Ok(many.into_vec())
    }

    pub async fn report_line_disruption(
        &self,
        journey_id: &str,
        line_code: &str,
    ) -> Result<DisruptionResponse> {
        let path = format!("{}/disruptions/line", journeys(journey_id));
        self.send_json(Method::Post, &path, &json!({ "lineCode": line_code }))
            .await
    }

    pub async fn report_station_disruption(
        &self,
        journey_id: &str,
        stop_id: &str,
    ) -> Result<DisruptionResponse> {
        let path = format!("{}/disruptions/station", journeys(journey_id));
        self.send_json(Method::Post, &path, &json!({ "stopId": stop_id }))
            .await
    }

    // -- Google Tasks proxy --

    pub async fn default_task_list(&self, user_id: &str) -> Result<TaskList> {
        self.get(&format!("{}/default-list", task_user(user_id)))
            .await
    }

    pub async fn list_tasks(&self, user_id: &str, list_id: &str) -> Result<Vec<Task>> {
        let many: Many<Task> = self.get(&list_tasks_path(user_id, list_id)).await?;
        Ok(many.into_vec())
    }

    pub async fn create_task(&self, user_id: &str, list_id: &str, task: &NewTask) -> Result<Task> {
        self.send_json(Method::Post, &list_tasks_path(user_id, list_id), task)
            .await
    }

    pub async fn patch_task(
        &self,
        user_id: &str,
        list_id: &str,
        task_id: &str,
        patch: &Value,
    ) -> Result<Task> {
        self.send_json(Method::Patch, &task_path(user_id, list_id, task_id), patch)
            .await
    }

    pub async fn complete_task(&self, user_id: &str, list_id: &str, task_id: &str) -> Result<()> {
        let path = format!("{}/complete", task_path(user_id, list_id, task_id));
        self.fire(Method::Post, &path).await
    }

    pub async fn delete_task(&self, user_id: &str, list_id: &str, task_id: &str) -> Result<()> {
        self.fire(Method::Delete, &task_path(user_id, list_id, task_id))
            .await
    }

    pub async fn tasks_for_journey(&self, user_id: &str, journey_id: &str) -> Result<Vec<Task>> {
        let path = format!(
            "{}/for-journey?journeyId={}",
            task_user(user_id),
            encode(journey_id)
        );
        let many: Many<Task> = self.get(&path).await?;
        Ok(many.into_vec())
    }

    pub async fn suggestions(&self, user_id: &str, date: &str) -> Result<Vec<Suggestion>> {
        let path = format!("{}/suggestions?date={}", task_user(user_id), encode(date));
        let many: Many<Suggestion> = self.get(&path).await?;
        Ok(many.into_vec())
    }

    // -- Eco-score --

    pub async fn eco_dashboard(&self, user_id: &str) -> Result<EcoDashboard> {
        self.get(&format!("/api/eco/dashboard?userId={}", encode(user_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct OneShot {
        response: std::result::Result<ApiResponse, TransportError>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl OneShot {
        fn status(status: u16, body: &str) -> ApiClient<Self> {
            ApiClient::new(OneShot {
                response: Ok(ApiResponse {
                    status,
                    body: body.to_string(),
                }),
                seen: RefCell::new(Vec::new()),
            })
        }
    }

    #[async_trait(?Send)]
    impl ApiTransport for OneShot {
        async fn send(
            &self,
            request: ApiRequest,
        ) -> std::result::Result<ApiResponse, TransportError> {
            self.seen.borrow_mut().push(request);
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_bearer_and_encoded_path() {
        let client = OneShot::status(200, r#"{"id": "u 1", "email": "a@b.c"}"#);
        client.set_token(Some("tok".into()));
        let user = client.get_user("u 1").await.unwrap();
        assert_eq!(user.id, "u 1");

        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].path, "/api/users/u%201");
        assert_eq!(seen[0].bearer.as_deref(), Some("tok"));
        assert_eq!(seen[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_auth_class_statuses_are_distinguished() {
        for status in [401, 403, 409] {
            let client = OneShot::status(status, "token expired");
            let err = client.default_task_list("u1").await.unwrap_err();
            assert_eq!(err, MavigoError::AuthRequired { status });
        }
    }

    #[tokio::test]
    async fn test_other_failures_carry_body_text() {
        let client = OneShot::status(422, "Unknown station");
        let err = client.journey_stops("j1").await.unwrap_err();
        assert_eq!(
            err,
            MavigoError::Request {
                status: 422,
                message: "Unknown station".into()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_success_body_is_fine_for_unit_results() {
        let client = OneShot::status(204, "");
        client.delete_task("u1", "l1", "t1").await.unwrap();
        assert_eq!(
            client.transport().seen.borrow()[0].path,
            "/api/google/tasks/users/u1/lists/l1/tasks/t1"
        );
    }

    #[tokio::test]
    async fn test_wrapped_and_bare_lists() {
        let client = OneShot::status(200, r#"{"items": [{"id": "t1", "title": "Milk"}]}"#);
        assert_eq!(client.list_tasks("u1", "l1").await.unwrap().len(), 1);

        let client = OneShot::status(200, r#"[{"journeyId": "j1"}, {"journeyId": "j2"}]"#);
        let request = PlanRequest {
            user_id: "u1".into(),
            from_query: "A".into(),
            to_query: "B".into(),
            departure_time: "2025-03-01T08:00".into(),
            preferences: Default::default(),
            tasks: None,
        };
        assert_eq!(client.plan_journey(&request).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let client = OneShot::status(200, "<html>");
        assert!(matches!(
            client.eco_dashboard("u1").await,
            Err(MavigoError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let client = ApiClient::new(OneShot {
            response: Err(TransportError("connection refused".into())),
            seen: RefCell::new(Vec::new()),
        });
        assert_eq!(
            client.get_user("u1").await.unwrap_err(),
            MavigoError::Network("connection refused".into())
        );
    }

    #[test]
    fn test_link_path_encodes_user() {
        assert_eq!(
            google_link_path("a&b"),
            "/api/google/tasks/link?userId=a%26b"
        );
    }
}
