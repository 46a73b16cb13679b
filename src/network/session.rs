//! Table Session Management
//!
//! Binds the deterministic table engine to connected clients. Owns the
//! authoritative [`TableState`] plus one outbound channel per seat, and
//! maps engine events to unicast or broadcast messages.

use std::collections::BTreeMap;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::game::events::TableEvent;
use crate::game::state::{PlayerId, TableState};
use crate::game::table::{self, IntentError, PlayerIntent};
use crate::network::protocol::{ServerMessage, TableView};

/// One shared table and its connected clients.
///
/// Callers hold the session behind an `RwLock`; every public method takes
/// `&mut self` so an intent is processed to completion before the next
/// one starts.
pub struct TableSession {
    /// Authoritative table state.
    state: TableState,
    /// Outbound channel per seated player.
    senders: BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>,
}

impl TableSession {
    /// Create a session around an empty table.
    pub fn new(rng_seed: u64) -> Self {
        Self {
            state: TableState::new(rng_seed),
            senders: BTreeMap::new(),
        }
    }

    /// Read access to the table, for snapshots and assertions.
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Number of connected seats.
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }

    /// Seat a newly connected client.
    ///
    /// On success the seat index is returned and every client receives a
    /// fresh snapshot (the join may have dealt a round).
    pub async fn connect(
        &mut self,
        player: PlayerId,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Result<usize, IntentError> {
        let events = table::join(&mut self.state, player)?;
        self.senders.insert(player, sender);

        let seat = self.state.seat_of(player).unwrap_or(0);
        debug!(player = %player.short(), seat, "player seated");

        self.dispatch(&events).await;
        Ok(seat)
    }

    /// Remove a client (explicit leave or transport drop).
    pub async fn disconnect(&mut self, player: PlayerId) {
        self.senders.remove(&player);
        let events = table::leave(&mut self.state, player);
        if !events.is_empty() {
            debug!(player = %player.short(), "player left table");
            self.dispatch(&events).await;
        }
    }

    /// Process one gameplay intent from a seated client.
    ///
    /// Rule rejections that warrant feedback go back to the sender only;
    /// protocol violations are dropped without a reply.
    pub async fn handle_intent(&mut self, player: PlayerId, intent: PlayerIntent) {
        match table::apply_intent(&mut self.state, player, intent) {
            Ok(events) => self.dispatch(&events).await,
            Err(err) if err.notifies_sender() => {
                self.send_to(
                    player,
                    ServerMessage::InvalidPlay {
                        reason: err.to_string(),
                    },
                )
                .await;
            }
            Err(err) => {
                debug!(player = %player.short(), %err, "intent ignored");
            }
        }
    }

    /// Turn engine events into wire messages.
    ///
    /// `WildChoiceRequired` goes to its owner alone and suppresses the
    /// snapshot: nothing visible changed for the other seats until the
    /// color commits.
    async fn dispatch(&mut self, events: &[TableEvent]) {
        let mut broadcast_view = false;

        for event in events {
            match event {
                TableEvent::WildChoiceRequired { player, origin } => {
                    self.send_to(
                        *player,
                        ServerMessage::WildChoiceRequired { origin: *origin },
                    )
                    .await;
                }
                TableEvent::RoundWon { winner } => {
                    self.broadcast(ServerMessage::RoundWon {
                        winner: winner.to_uuid_string(),
                    })
                    .await;
                    broadcast_view = true;
                }
                _ => {
                    broadcast_view = true;
                }
            }
        }

        if broadcast_view {
            let view = TableView::from_state(&self.state);
            self.broadcast(ServerMessage::Table(view)).await;
        }
    }

    /// Send to one seat. A full or closed channel drops the message; the
    /// reader task notices the dead connection and disconnects the seat.
    async fn send_to(&self, player: PlayerId, message: ServerMessage) {
        if let Some(sender) = self.senders.get(&player) {
            if sender.send(message).await.is_err() {
                warn!(player = %player.short(), "outbound channel closed");
            }
        }
    }

    /// Send to every connected seat.
    pub async fn broadcast(&self, message: ServerMessage) {
        for (player, sender) in &self.senders {
            if sender.send(message.clone()).await.is_err() {
                warn!(player = %player.short(), "outbound channel closed");
            }
        }
    }
}
