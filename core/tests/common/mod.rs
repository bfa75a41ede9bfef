#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use serde_json::{json, Value};

use mavigo_core::models::{Journey, User};
use mavigo_core::settings::Setting;
use mavigo_core::{
    ApiRequest, ApiResponse, ApiTransport, AppState, ClientConfig, MavigoClient, MemoryStore,
    Method, TransportError,
};

/// Scripted backend. Each route answers from its queue; the last answer repeats.
#[derive(Default)]
pub struct FakeBackend {
    routes: RefCell<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse { status, body });
        self
    }

    pub fn on_text(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(ApiResponse {
                status,
                body: body.to_string(),
            });
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn bodies(&self, method: Method, path: &str) -> Vec<Option<Value>> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .map(|r| r.body.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl ApiTransport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = (request.method, request.path.clone());
        self.requests.borrow_mut().push(request);

        let mut routes = self.routes.borrow_mut();
        let Some(queue) = routes.get_mut(&key) else {
            return Ok(ApiResponse {
                status: 404,
                body: format!("no route for {} {}", key.0.as_str(), key.1),
            });
        };
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| TransportError("empty route".into()))
    }
}

pub type TestClient = MavigoClient<FakeBackend, MemoryStore>;

pub fn client() -> TestClient {
    MavigoClient::new(ClientConfig::default(), FakeBackend::default(), MemoryStore::new())
}

pub fn client_with(entries: &[(Setting, &str)]) -> TestClient {
    MavigoClient::new(
        ClientConfig::default(),
        FakeBackend::default(),
        MemoryStore::with(entries),
    )
}

pub fn backend(client: &TestClient) -> &FakeBackend {
    client.api().transport()
}

pub fn user_json(id: &str, linked: bool) -> Value {
    let mut user = json!({
        "id": id,
        "displayName": "Ada Lovelace",
        "email": "ada@example.org",
        "homeAddress": "10 rue de Lyon",
    });
    if linked {
        user["googleAccountLinkedAt"] = json!("2025-01-05T10:00:00Z");
    }
    user
}

pub fn user(id: &str, linked: bool) -> User {
    serde_json::from_value(user_json(id, linked)).expect("valid user fixture")
}

pub fn logged_in(linked: bool) -> RefCell<AppState> {
    RefCell::new(AppState::for_user(user("u1", linked)))
}

pub fn journey_json(id: &str, status: &str) -> Value {
    json!({
        "journeyId": id,
        "status": status,
        "originLabel": "Gare de Lyon",
        "destinationLabel": "République",
        "plannedDeparture": "2025-03-01T08:00:00",
        "plannedArrival": "2025-03-01T08:40:00",
        "segments": [
            {"type": "METRO", "lineCode": "1", "originLabel": "Gare de Lyon",
             "destinationLabel": "Bastille", "durationSeconds": 180}
        ]
    })
}

pub fn journey(id: &str, status: &str) -> Journey {
    serde_json::from_value(journey_json(id, status)).expect("valid journey fixture")
}
