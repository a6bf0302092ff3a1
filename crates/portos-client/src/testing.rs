//! In-process stand-in for the storefront API.
//!
//! Routes are canned `(status, body)` pairs keyed by method and path. Every
//! request is recorded so tests can assert what actually went over the wire.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::http::{StorefrontClient, REQUEST_ID_HEADER};
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), (u16, String)>>,
    seen: Mutex<Vec<SeenRequest>>,
}

pub(crate) struct MockApi {
    base_url: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub(crate) async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        MockApi {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub(crate) fn respond(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub(crate) fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }

    pub(crate) fn client(&self) -> StorefrontClient {
        StorefrontClient::with_base_url(&self.base_url, SessionStore::in_memory(7)).unwrap()
    }

    pub(crate) async fn logged_in_client(&self, token: &str) -> StorefrontClient {
        let client = self.client();
        client.session().begin(token, None).await.unwrap();
        client
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.seen.lock().unwrap().push(SeenRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        request_id: header(REQUEST_ID_HEADER),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned();

    match canned {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            [("content-type", "application/json")],
            body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [("content-type", "application/json")],
            r#"{"message":"no route"}"#.to_string(),
        )
            .into_response(),
    }
}
