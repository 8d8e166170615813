//! Log server

use crate::api::http::{create_router, AppState};
use crate::common::{Config, Result};
use crate::log::Log;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

pub struct LogServer {
    config: Config,
    log: Arc<Log>,
}

impl LogServer {
    pub fn new(config: Config, log: Arc<Log>) -> Self {
        Self { config, log }
    }

    /// Bind the configured address and serve until SIGINT or SIGTERM
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_listener<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!("Starting log server");
        tracing::info!("  HTTP API: {}", addr);
        match self.config.max_body_bytes {
            Some(limit) => tracing::info!("  Max body: {} bytes", limit),
            None => tracing::info!("  Max body: unlimited"),
        }

        let router = create_router(AppState::new(self.log), self.config.max_body_bytes);

        tracing::info!("✓ Log server ready");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shut down gracefully");
        Ok(())
    }
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
