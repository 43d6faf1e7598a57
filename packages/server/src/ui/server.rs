//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    AuthenticateUseCase, ConnectClientUseCase, DisconnectClientUseCase, ManageFriendsUseCase,
    MatchmakingUseCase, RelayUseCase,
};

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Matchmaking and relay server
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     authenticate_usecase,
///     manage_friends_usecase,
///     matchmaking_usecase,
///     relay_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        authenticate_usecase: Arc<AuthenticateUseCase>,
        manage_friends_usecase: Arc<ManageFriendsUseCase>,
        matchmaking_usecase: Arc<MatchmakingUseCase>,
        relay_usecase: Arc<RelayUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_client_usecase,
                disconnect_client_usecase,
                authenticate_usecase,
                manage_friends_usecase,
                matchmaking_usecase,
                relay_usecase,
            }),
        }
    }

    /// Builds the router: `/ws` for the event channel, `/api/health` for liveness.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Binds to `host:port` and serves until Ctrl+C or SIGTERM.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Matchmaking server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serves on an already bound listener without a shutdown signal.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}
