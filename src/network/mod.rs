//! Network Layer
//!
//! WebSocket server for real-time multiplayer communication.
//! This layer is **non-deterministic** - all game logic runs through `game/`.

pub mod protocol;
pub mod session;
pub mod server;

pub use protocol::{ClientMessage, ErrorCode, ServerError, ServerMessage, TableView};
pub use session::TableSession;
pub use server::{ServerConfig, TableServer, TableServerError};
