//! Test doubles shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use store::MemoryStore;

use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::UserIdentity;
use crate::navigation::HistoryNavigator;
use crate::transport::{ApiRequest, ApiResponse, Transport, REISSUE_HEADER};

pub fn identity(username: &str) -> UserIdentity {
    UserIdentity {
        id: 1,
        username: username.to_string(),
        name: format!("{username} name"),
        email: format!("{username}@example.com"),
        bio: None,
        created_at: "2025-01-01T00:00:00".to_string(),
        profile_image_url: None,
    }
}

pub fn identity_json(username: &str) -> serde_json::Value {
    serde_json::to_value(identity(username)).unwrap()
}

/// Builder for scripted responses.
pub struct Reply(ApiResponse);

impl Reply {
    pub fn status(status: u16) -> Self {
        Self(ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        })
    }

    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.0.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        self
    }

    pub fn reissue(mut self) -> Self {
        self.0
            .headers
            .insert(REISSUE_HEADER, HeaderValue::from_static("true"));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.0.body = serde_json::to_vec(&body).unwrap();
        self
    }
}

#[derive(Default)]
struct Script {
    replies: HashMap<(Method, String), VecDeque<ApiResponse>>,
    sent: Vec<ApiRequest>,
}

/// Transport that replays queued replies per `(method, path)` and records
/// every request it receives. Unscripted calls fail as network errors.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.lock()
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply.0);
        self
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.lock().sent.clone()
    }

    pub fn calls(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.sent()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut script = self.lock();
        script.sent.push(request.clone());
        script
            .replies
            .get_mut(&(request.method.clone(), request.path.clone()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                ApiError::Network(format!("unscripted {} {}", request.method, request.path))
            })
    }
}

/// A client wired to in-memory doubles.
pub struct Harness {
    pub client: ApiClient<MemoryStore, ScriptedTransport>,
    pub transport: ScriptedTransport,
    pub navigator: HistoryNavigator,
    pub storage: MemoryStore,
}

impl Harness {
    pub fn at(path: &str) -> Self {
        let transport = ScriptedTransport::default();
        let navigator = HistoryNavigator::new(path);
        let storage = MemoryStore::new();
        let client = ApiClient::with_transport(
            ApiConfig::default(),
            transport.clone(),
            storage.clone(),
            Arc::new(navigator.clone()),
        );
        Self {
            client,
            transport,
            navigator,
            storage,
        }
    }

    /// Harness with a stored credential and an authenticated session.
    pub async fn signed_in(path: &str, username: &str, token: &str) -> Self {
        let harness = Self::at(path);
        harness.client.tokens().set(token).await;
        harness
            .client
            .session()
            .set_authenticated(identity(username))
            .await;
        harness
    }
}
