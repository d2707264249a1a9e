//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use futures::StreamExt;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use talkie_api::{AppState, build_app};
use talkie_core::config::AppConfig;
use talkie_database::{MemoryUserStore, UserStore};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "password123";

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for inspecting the gateway directly
    pub state: AppState,
    /// In-memory user store behind the state
    pub users: Arc<MemoryUserStore>,
}

/// A captured response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A user created through the signup endpoint
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    config.server.environment = "test".to_string();
    config.realtime.ping_interval_seconds = 0;
    config.auth.password_memory_kib = 1024;
    config.auth.password_iterations = 1;
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from a tweaked configuration
    pub fn with_config(config: AppConfig) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let store: Arc<dyn UserStore> = users.clone();
        Self::with_store(config, users, store)
    }

    /// Create a test application around a custom store wrapping `users`
    pub fn with_store(config: AppConfig, users: Arc<MemoryUserStore>, store: Arc<dyn UserStore>) -> Self {
        let state = AppState::new(Arc::new(config), store).expect("valid test configuration");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            users,
        }
    }

    /// Make a request; `token` goes in an `Authorization: Bearer` header
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder, body).await
    }

    /// Make a request with arbitrary extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder, None).await
    }

    async fn send(&self, builder: axum::http::request::Builder, body: Option<Value>) -> TestResponse {
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sign up a user and return its id and token
    pub async fn signup(&self, email: &str) -> TestUser {
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({
                    "fullName": "Test User",
                    "email": email,
                    "password": TEST_PASSWORD,
                    "bio": "Hello there",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        TestUser {
            id: response.body["userData"]["_id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: response.body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Serve the app on an ephemeral port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }
}

/// Open a WebSocket to a spawned server
pub async fn ws_connect(addr: SocketAddr, query: &str) -> WsClient {
    let (client, _) = connect_async(format!("ws://{addr}/ws{query}"))
        .await
        .expect("WebSocket handshake failed");
    client
}

/// Next `getOnlineUsers` payload, sorted
pub async fn next_online_users(client: &mut WsClient) -> Vec<String> {
    let deadline = Duration::from_secs(5);
    loop {
        let frame = tokio::time::timeout(deadline, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("WebSocket error");

        if let Message::Text(text) = frame {
            let value: Value = serde_json::from_str(text.as_str()).unwrap();
            assert_eq!(value["event"], "getOnlineUsers");
            let mut users: Vec<String> = value["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect();
            users.sort();
            return users;
        }
    }
}

/// Sorted owned ids
pub fn ids<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut ids: Vec<String> = raw.iter().map(|s| s.as_ref().to_string()).collect();
    ids.sort();
    ids
}
