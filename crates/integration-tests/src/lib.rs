//! End-to-end tests for the Beverly Technologies API.
//!
//! Each test starts the real router on an ephemeral localhost port with a
//! fresh in-memory state and talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p beverly-integration-tests
//! ```
//!
//! Set `BEVERLY_BASE_URL` to run the same suite against an already running
//! server instead (tests that inspect in-process state are skipped then).

use beverly_server::config::ServerConfig;
use beverly_server::state::AppState;
use reqwest::{Client, Method, Response};
use serde_json::Value;

/// A server under test.
pub struct TestApp {
    /// Base URL including the `/api` prefix.
    pub api: String,
    /// In-process state, if the server was spawned by this harness.
    pub state: Option<AppState>,
    client: Client,
}

impl TestApp {
    /// Spawn a fresh server, or target `BEVERLY_BASE_URL` when it is set.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        if let Ok(base) = std::env::var("BEVERLY_BASE_URL") {
            return Self {
                api: format!("{}/api", base.trim_end_matches('/')),
                state: None,
                client: Client::new(),
            };
        }

        Self::spawn_with(ServerConfig::for_tests()).await
    }

    /// Spawn a fresh in-process server with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn_with(config: ServerConfig) -> Self {
        let state = AppState::new(config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = beverly_server::app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });

        Self {
            api: format!("http://{addr}/api"),
            state: Some(state),
            client: Client::new(),
        }
    }

    /// Send a request and return the raw response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Response {
        let mut request = self.client.request(method, format!("{}{path}", self.api));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.expect("Failed to send request")
    }

    /// Send a request and decode the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> (u16, Value) {
        let response = self.request(method, path, token, body).await;
        let status = response.status().as_u16();
        let body = response.json().await.expect("Response was not JSON");
        (status, body)
    }

    /// Register an account and return its token.
    ///
    /// # Panics
    ///
    /// Panics unless registration succeeds.
    pub async fn register(&self, email: &str, password: &str, username: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "username": username,
        });
        let (status, body) = self
            .call(Method::POST, "/auth/register", None, Some(&body))
            .await;
        assert_eq!(status, 201, "registration failed: {body}");
        body["token"]
            .as_str()
            .expect("Registration returned no token")
            .to_string()
    }
}
