//! Web server for blogd.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::{AuthConfig, ServerConfig};
use crate::Database;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Host name or IP to bind.
    host: String,
    /// Port to bind; 0 picks a free one.
    port: u16,
    /// Application state.
    app_state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(server: &ServerConfig, auth: &AuthConfig, db: Database) -> Self {
        let app_state = AppState::new(db, &auth.jwt_secret, auth.bcrypt_cost);
        Self::from_state(server.host.clone(), server.port, Arc::new(app_state))
    }

    /// Create a web server around prepared state.
    pub fn from_state(host: impl Into<String>, port: u16, app_state: Arc<AppState>) -> Self {
        Self {
            host: host.into(),
            port,
            app_state,
        }
    }

    /// Configured host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Bind the listener, resolving the host name if needed.
    async fn bind(&self) -> std::result::Result<TcpListener, std::io::Error> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }

    /// Build the router served by this server.
    pub fn router(&self) -> Router {
        create_router(self.app_state.clone())
    }

    /// Run the web server until SIGINT or SIGTERM.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        self.run_until(shutdown_signal()).await
    }

    /// Run the web server until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn run_until<F>(self, shutdown: F) -> std::result::Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
