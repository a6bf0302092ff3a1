//! # HTTP Executor
//!
//! One place that turns a [`Request`] into a typed result. Every API wrapper
//! goes through [`StorefrontClient::execute`], so auth, request ids, logging
//! and status mapping are uniform.
//!
//! ## Status Mapping
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  protected + no token ──► Unauthorized        (no request sent)      │
//! │  send() fails         ──► Transport                                  │
//! │  2xx                  ──► decode JSON (empty body reads as null)     │
//! │  401                  ──► session.end(), Unauthorized                │
//! │  404                  ──► NotFound(per-call message)                 │
//! │  other                ──► Api { status, server message | fallback }  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;

/// Correlates a client log line with the server's access log.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Needs `Authorization: Bearer <token>`.
    Protected,
}

/// A single API call, before it is sent.
#[derive(Debug)]
pub(crate) struct Request {
    method: Method,
    path: String,
    access: Access,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
    failure: &'static str,
    not_found: &'static str,
}

impl Request {
    pub(crate) fn new(method: Method, path: impl Into<String>, access: Access) -> Self {
        Request {
            method,
            path: path.into(),
            access,
            query: Vec::new(),
            body: None,
            failure: "Request failed",
            not_found: "Not found",
        }
    }

    pub(crate) fn get(path: impl Into<String>, access: Access) -> Self {
        Self::new(Method::GET, path, access)
    }

    pub(crate) fn post(path: impl Into<String>, access: Access) -> Self {
        Self::new(Method::POST, path, access)
    }

    pub(crate) fn put(path: impl Into<String>, access: Access) -> Self {
        Self::new(Method::PUT, path, access)
    }

    pub(crate) fn delete(path: impl Into<String>, access: Access) -> Self {
        Self::new(Method::DELETE, path, access)
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(
            serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?,
        );
        Ok(self)
    }

    pub(crate) fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Message used when a failed response carries none of its own.
    pub(crate) fn on_failure(mut self, message: &'static str) -> Self {
        self.failure = message;
        self
    }

    pub(crate) fn on_not_found(mut self, message: &'static str) -> Self {
        self.not_found = message;
        self
    }
}

// =============================================================================
// Client
// =============================================================================

/// Storefront API client. Cheap to clone; clones share the connection pool
/// and the session.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig, session: SessionStore) -> ClientResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(StorefrontClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url()?,
                session,
            }),
        })
    }

    /// Client for `base_url` with default settings otherwise.
    pub fn with_base_url(base_url: &str, session: SessionStore) -> ClientResult<Self> {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        Self::new(&config, session)
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> Url {
        let mut url = self.inner.base_url.clone();
        let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Sends the request and decodes a 2xx body into `T`.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, request: Request) -> ClientResult<T> {
        let url = self.url(&request.path, &request.query);
        let request_id = Uuid::new_v4();

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if request.access == Access::Protected {
            let Some(bearer) = self.inner.session.bearer().await else {
                debug!(path = %request.path, "Protected call without a session");
                return Err(ClientError::Unauthorized);
            };
            builder = builder.header(AUTHORIZATION, bearer);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            warn!(%request_id, method = %request.method, path = %request.path, error = %e, "Request failed to send");
            ClientError::from(e)
        })?;
        let status = response.status();

        debug!(
            %request_id,
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API call"
        );

        if status.is_success() {
            let bytes = response.bytes().await?;
            return decode_body(&bytes);
        }

        let body: Option<serde_json::Value> = response.json().await.ok();
        Err(self.map_failure(status, body.as_ref(), &request).await)
    }

    /// Like [`Self::execute`] for calls whose response body is irrelevant.
    pub(crate) async fn execute_ack(&self, request: Request) -> ClientResult<()> {
        self.execute::<IgnoredAny>(request).await.map(|_| ())
    }

    async fn map_failure(
        &self,
        status: StatusCode,
        body: Option<&serde_json::Value>,
        request: &Request,
    ) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!(path = %request.path, "Session rejected by server, logging out");
                if let Err(e) = self.inner.session.end().await {
                    warn!(error = %e, "Failed to clear session");
                }
                ClientError::Unauthorized
            }
            StatusCode::NOT_FOUND => ClientError::NotFound(request.not_found.to_string()),
            other => ClientError::Api {
                status: other.as_u16(),
                message: server_message(body).unwrap_or_else(|| request.failure.to_string()),
            },
        }
    }
}

/// The server puts its explanation in `message`, occasionally in `error`.
fn server_message(body: Option<&serde_json::Value>) -> Option<String> {
    let body = body?;
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
    let trimmed = bytes.trim_ascii();
    let source: &[u8] = if trimmed.is_empty() { b"null" } else { trimmed };
    serde_json::from_slice(source).map_err(|e| ClientError::Decode(e.to_string()))
}
