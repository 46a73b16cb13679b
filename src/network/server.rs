//! WebSocket Table Server
//!
//! Async WebSocket server for multiplayer connections. Accepts clients,
//! seats them at the shared table, and routes gameplay messages into the
//! session.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::core::rng::derive_table_seed;
use crate::game::state::PlayerId;
use crate::game::table::IntentError;
use crate::network::protocol::{ClientMessage, ErrorCode, ServerError, ServerMessage};
use crate::network::session::TableSession;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 3000).into(),
            max_connections: 64,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Table server errors.
#[derive(Debug, thiserror::Error)]
pub enum TableServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// The table server: one shared table, many connections.
pub struct TableServer {
    /// Server configuration.
    config: ServerConfig,
    /// The shared table session.
    session: Arc<RwLock<TableSession>>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl TableServer {
    /// Create a new table server with a freshly seeded table.
    pub fn new(config: ServerConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let table_id = uuid::Uuid::new_v4().into_bytes();
        let seed = derive_table_seed(&table_id, &[]);

        Self {
            config,
            session: Arc::new(RwLock::new(TableSession::new(seed))),
            shutdown_tx,
        }
    }

    /// Run the server until shutdown.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), TableServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Table server listening on {}", self.config.bind_addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let connections = self.session.read().await.connection_count();
                            if connections >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let session = self.session.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    let text = match msg.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            // Seat held by this connection, once Join succeeds.
            let mut seated: Option<PlayerId> = None;

            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let client_msg = match ClientMessage::from_json(&text) {
                                    Ok(m) => m,
                                    Err(e) => {
                                        debug!("Invalid message from {}: {}", addr, e);
                                        let _ = msg_tx.send(ServerMessage::Error(ServerError {
                                            code: ErrorCode::MalformedMessage,
                                            message: "Invalid message format".to_string(),
                                        })).await;
                                        continue;
                                    }
                                };

                                Self::handle_client_message(
                                    addr,
                                    client_msg,
                                    &session,
                                    &mut seated,
                                    &msg_tx,
                                ).await;
                            }
                            Some(Ok(Message::Ping(_))) => {
                                let _ = msg_tx.send(ServerMessage::Pong {
                                    timestamp: 0,
                                    server_time: unix_millis(),
                                }).await;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = msg_tx.send(ServerMessage::Shutdown {
                            reason: "Server shutting down".to_string(),
                        }).await;
                        break;
                    }
                }
            }

            sender_task.abort();

            // Vacate the seat on any exit path.
            if let Some(player) = seated {
                session.write().await.disconnect(player).await;
            }

            info!("Client {} cleaned up", addr);
        });
    }

    /// Handle a client message.
    async fn handle_client_message(
        addr: SocketAddr,
        msg: ClientMessage,
        session: &Arc<RwLock<TableSession>>,
        seated: &mut Option<PlayerId>,
        sender: &mpsc::Sender<ServerMessage>,
    ) {
        match msg {
            ClientMessage::Join { player_id } => {
                if seated.is_some() {
                    let _ = sender.send(ServerMessage::Error(ServerError {
                        code: ErrorCode::AlreadySeated,
                        message: "This connection already holds a seat".to_string(),
                    })).await;
                    return;
                }

                let player = player_id
                    .as_deref()
                    .and_then(PlayerId::from_uuid_str)
                    .unwrap_or_else(PlayerId::random);

                let result = session
                    .write()
                    .await
                    .connect(player, sender.clone())
                    .await;
                match result {
                    Ok(seat) => {
                        *seated = Some(player);
                        let _ = sender.send(ServerMessage::SeatAssigned {
                            player_id: player.to_uuid_string(),
                            seat,
                        }).await;
                    }
                    Err(err) => {
                        let code = match err {
                            IntentError::TableFull => ErrorCode::TableFull,
                            IntentError::AlreadySeated => ErrorCode::AlreadySeated,
                            _ => ErrorCode::InternalError,
                        };
                        let _ = sender.send(ServerMessage::Error(ServerError {
                            code,
                            message: err.to_string(),
                        })).await;
                    }
                }
            }
            ClientMessage::PlayCard { .. } | ClientMessage::DrawCard => {
                let Some(player) = *seated else {
                    let _ = sender.send(ServerMessage::Error(ServerError {
                        code: ErrorCode::NotSeated,
                        message: "Join the table first".to_string(),
                    })).await;
                    return;
                };
                if let Some(intent) = msg.to_intent() {
                    session.write().await.handle_intent(player, intent).await;
                }
            }
            ClientMessage::Leave => {
                if let Some(player) = seated.take() {
                    session.write().await.disconnect(player).await;
                    debug!("Client {} vacated its seat", addr);
                }
            }
            ClientMessage::Ping { timestamp } => {
                let _ = sender.send(ServerMessage::Pong {
                    timestamp,
                    server_time: unix_millis(),
                }).await;
            }
        }
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.session.read().await.connection_count()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_connections, 64);
    }

    #[tokio::test]
    async fn test_server_creation() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        };
        let server = TableServer::new(config);
        assert_eq!(server.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_server_shutdown() {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        };
        let server = TableServer::new(config);
        server.shutdown();
        // Should not panic
    }
}
