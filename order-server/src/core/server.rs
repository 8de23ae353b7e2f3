//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::api;
use crate::auth;
use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
use crate::middleware::rate_limit;
use crate::services::cleanup;
use shared::error::AppResult;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Start background tasks
        let mut tasks = BackgroundTasks::new();
        let sweeper_db = state.db.clone();
        let interval = self.config.cleanup_interval_seconds;
        let token = tasks.shutdown_token();
        tasks.spawn("ttl-sweeper", TaskKind::Periodic, async move {
            cleanup::run_sweeper(sweeper_db, interval, token).await;
        });

        let app = api::router(state.clone())
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth::authenticate,
            ))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                rate_limit,
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🦀 Order Server starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| shared::error::AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| shared::error::AppError::internal(format!("Server error: {e}")))?;

        tasks.shutdown().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
