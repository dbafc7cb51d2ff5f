use super::handlers::{health_handler, not_found_handler, test_error_handler};
use crate::config::ServerConfig;
use crate::error::{InfraError, Result};
use crate::shutdown::ShutdownCoordinator;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/test-error", get(test_error_handler))
        .fallback(not_found_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// HTTP front of the API process, drained by a [`ShutdownCoordinator`]
pub struct ApiServer {
    pub(crate) config: ServerConfig,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.bind_address();
        TcpListener::bind(&addr)
            .await
            .map_err(|e| InfraError::Server {
                message: format!("Failed to bind {}: {}", addr, e),
            })
    }

    /// Serve until the coordinator starts draining and open connections finish
    pub async fn serve(listener: TcpListener, coordinator: ShutdownCoordinator) -> Result<()> {
        let addr = listener.local_addr()?;
        info!("Server listening on {}", addr);

        axum::serve(listener, router())
            .with_graceful_shutdown(coordinator.drain_signal())
            .await
            .map_err(|e| InfraError::Server {
                message: e.to_string(),
            })?;

        info!("Listener on {} closed", addr);
        Ok(())
    }
}
