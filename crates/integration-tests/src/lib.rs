//! Integration tests for Stockyard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockyard-integration-tests
//! ```
//!
//! Tests run the real server router against an in-process mock of the
//! inventory backend. The mock keeps its state in memory and evolves it
//! with the same reconciliation functions the server gates with, so the
//! two sides agree on the state machine.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod mock_backend;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

use stockyard_server::config::{InventoryApiConfig, ServerConfig};
use stockyard_server::state::AppState;

use mock_backend::BackendState;

/// A running server + mock backend pair for one test.
pub struct TestContext {
    /// HTTP client for requests against the server.
    pub client: reqwest::Client,
    /// Base URL of the Stockyard server under test.
    pub server_url: String,
    /// Shared handle on the mock backend's state.
    pub backend: Arc<Mutex<BackendState>>,
}

impl TestContext {
    /// Spawn the mock backend and the server on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics if either listener cannot bind; tests cannot proceed without
    /// them.
    pub async fn spawn(state: BackendState) -> Self {
        let backend = Arc::new(Mutex::new(state));

        let backend_addr = serve(mock_backend::router(Arc::clone(&backend))).await;

        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://localhost:0".to_string(),
            inventory: InventoryApiConfig {
                base_url: url::Url::parse(&format!("http://{backend_addr}/"))
                    .expect("valid backend url"),
                api_token: SecretString::from("kQ9#vLr2@pXw7$tZn4!bHm8&cJf3*dGs6"),
                tenant: "acme-test".to_string(),
                timeout: std::time::Duration::from_secs(5),
            },
        };

        let app_state = AppState::new(config);
        let server_addr = serve(stockyard_server::build_router(app_state)).await;

        Self {
            client: reqwest::Client::new(),
            server_url: format!("http://{server_addr}"),
            backend,
        }
    }

    /// Spawn with the standard demo state.
    pub async fn spawn_demo() -> Self {
        Self::spawn(BackendState::demo()).await
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

/// Bind a router on an ephemeral port and serve it in the background.
async fn serve(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test server error");
    });
    addr
}
