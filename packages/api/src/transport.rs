//! # HTTP transport — the one place that touches the network
//!
//! [`Transport`] sends a fully described [`ApiRequest`] and hands back the raw
//! [`ApiResponse`] (status, headers, body) without judging it. Status handling
//! belongs to the interceptor in [`crate::client`], which keeps the decision
//! table testable against a scripted transport.
//!
//! [`ReqwestTransport`] is the production implementation:
//!
//! - **Native**: a `reqwest::Client` with a cookie jar, so the refresh-session
//!   cookie set by `/login` is replayed on `/token/reissue`.
//! - **Web**: the browser owns cookies; every fetch is sent with
//!   `credentials: include`.
//!
//! Only transport failures (DNS, connection reset, CORS rejection) surface as
//! errors here. Any HTTP status, including 5xx, is an `Ok` response.

use std::future::Future;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::token::{bearer_value, parse_bearer};

/// Response header the server sets on a 401 that may be recovered by reissue.
pub const REISSUE_HEADER: &str = "x-reissue-token";

/// An outbound call, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path relative to the API prefix, e.g. `/user/my`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Credential attached by the request interceptor.
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn queries(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }
}

/// Raw response as received.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Credential from an `Authorization: Bearer <token>` response header.
    pub fn bearer_token(&self) -> Option<String> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_string)
    }

    /// Whether the server marked this failure as recoverable by reissue.
    pub fn reissue_allowed(&self) -> bool {
        self.headers
            .get(REISSUE_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// `message` field of a JSON error body, if present.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }

    /// Convert a non-success response into the matching error.
    pub fn into_error(self) -> ApiError {
        ApiError::Status {
            message: self.error_message(),
            status: self.status,
        }
    }
}

pub trait Transport: Clone {
    fn send(&self, request: &ApiRequest) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

/// Production transport backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ReqwestTransport {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let http = builder
            .build()
            .map_err(|e| ApiError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.config.endpoint(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, bearer_value(token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        tracing::debug!("{} {} -> {}", request.method, request.path, status);

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap as AxumHeaders;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    async fn login() -> impl IntoResponse {
        (
            [
                ("authorization", "Bearer abc123"),
                ("set-cookie", "refresh=r1; Path=/"),
            ],
            "",
        )
    }

    async fn reissue(headers: AxumHeaders) -> axum::response::Response {
        let has_cookie = headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("refresh=r1"));
        if has_cookie {
            ([("authorization", "Bearer xyz789")], "").into_response()
        } else {
            (StatusCode::UNAUTHORIZED, "").into_response()
        }
    }

    async fn me(headers: AxumHeaders) -> axum::response::Response {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer abc123") => Json(serde_json::json!({"seen": "abc123"})).into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                [(REISSUE_HEADER, "true")],
                Json(serde_json::json!({"message": "token expired"})),
            )
                .into_response(),
        }
    }

    async fn serve() -> ApiConfig {
        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/token/reissue", post(reissue))
            .route("/api/user/my", get(me));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        ApiConfig::new(format!("http://{addr}")).unwrap()
    }

    #[tokio::test]
    async fn test_reqwest_transport_against_live_server() {
        let transport = ReqwestTransport::new(serve().await).unwrap();

        let login = transport.send(&ApiRequest::post("/login")).await.unwrap();
        assert!(login.is_success());
        assert_eq!(login.bearer_token().as_deref(), Some("abc123"));

        // Cookie jar replays the refresh cookie
        let reissued = transport.send(&ApiRequest::post("/token/reissue")).await.unwrap();
        assert_eq!(reissued.bearer_token().as_deref(), Some("xyz789"));

        let mut request = ApiRequest::get("/user/my");
        request.bearer = Some("abc123".to_string());
        let ok = transport.send(&request).await.unwrap();
        assert_eq!(ok.json::<serde_json::Value>().unwrap()["seen"], "abc123");

        request.bearer = Some("old".to_string());
        let expired = transport.send(&request).await.unwrap();
        assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
        assert!(expired.reissue_allowed());
        assert_eq!(expired.error_message().as_deref(), Some("token expired"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let config = ApiConfig::new("http://127.0.0.1:9").unwrap();
        let transport = ReqwestTransport::new(config).unwrap();
        let err = transport.send(&ApiRequest::get("/user/my")).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
