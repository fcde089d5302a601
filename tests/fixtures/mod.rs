//! Shared test fixtures.

use std::{sync::Arc, time::Duration};

use minato::{
    ServerConfig,
    infrastructure::{channel::InMemoryChannelLayer, repository::InMemoryStore},
    ui::{build_router, state::AppState},
};

/// A server instance running on a background task for one test.
///
/// Each test uses its own port so tests can run in parallel.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start a server with the default 20s notification poll cadence.
    pub async fn start(port: u16) -> Self {
        Self::start_with_poll(port, 20).await
    }

    /// Start a server with an explicit notification poll cadence.
    pub async fn start_with_poll(port: u16, poll_interval_secs: u64) -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            poll_interval_secs,
        };
        tokio::spawn(async move {
            if let Err(e) = minato::run_server(config).await {
                panic!("Test server failed to run: {e}");
            }
        });

        let server = Self { port };
        server.wait_ready().await;
        server
    }

    /// Start a server built around a hand-held channel layer, so tests can
    /// observe group memberships and broadcast into groups directly.
    pub async fn start_observable(
        port: u16,
        poll_interval_secs: u64,
    ) -> (Self, Arc<InMemoryChannelLayer>) {
        let store = Arc::new(InMemoryStore::new());
        let channel = Arc::new(InMemoryChannelLayer::new());
        let state = Arc::new(AppState {
            users: store.clone(),
            messages: store.clone(),
            notifications: store,
            channel: channel.clone(),
            poll_interval: Duration::from_secs(poll_interval_secs),
        });
        let app = build_router(state);

        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                .await
                .expect("Failed to bind test listener");
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server failed to run: {e}");
            }
        });

        let server = Self { port };
        server.wait_ready().await;
        (server, channel)
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, path: &str, user_id: Option<i64>) -> String {
        match user_id {
            Some(id) => format!("ws://127.0.0.1:{}{}?user_id={}", self.port, path, id),
            None => format!("ws://127.0.0.1:{}{}", self.port, path),
        }
    }

    /// Create a user through the admin API and return its id.
    pub async fn create_user(&self, username: &str) -> i64 {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/api/users", self.base_url()))
            .json(&serde_json::json!({"username": username}))
            .send()
            .await
            .expect("Failed to create user");
        assert_eq!(response.status(), 201);
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_i64().expect("id missing")
    }

    /// Inject a notification for a user through the admin API.
    pub async fn create_notification(&self, user_id: i64, message: &str) {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/api/users/{}/notifications", self.base_url(), user_id))
            .json(&serde_json::json!({"message": message}))
            .send()
            .await
            .expect("Failed to create notification");
        assert_eq!(response.status(), 201);
    }

    async fn wait_ready(&self) {
        for _ in 0..80 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("Test server on port {} never became ready", self.port);
    }
}
