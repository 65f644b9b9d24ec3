//! Test server harness for integration tests.
//!
//! Spins up the real router on a random port so tests can talk to it
//! over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use emojiart_client::ImageGenerator;
use emojiart_server::{router, AppState, ServerConfig, ShareCache};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    cache: ShareCache,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server without an upstream generator.
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default(), None).await
    }

    /// Start a server on a random available port.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or server fails to bind.
    #[allow(dead_code)]
    pub async fn start_with(
        mut config: ServerConfig,
        generator: Option<Arc<dyn ImageGenerator>>,
    ) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        config.port = port;

        let state = AppState::new(config, generator);
        let cache = state.cache().clone();
        let app = router(state);

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            cache,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Base URL of the server, without trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of a path on the server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// The server's share cache (for test assertions).
    #[allow(dead_code)]
    pub fn cache(&self) -> &ShareCache {
        &self.cache
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), self.handle).await;
    }
}
