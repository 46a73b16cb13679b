//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket.
//! All messages are serialized as JSON for debugging ease,
//! with optional binary (bincode) for flat payloads.

use serde::{Deserialize, Serialize};

use crate::game::card::{Card, Color};
use crate::game::events::WildOriginKind;
use crate::game::state::{PlayerId, TablePhase, TableState};
use crate::game::table::PlayerIntent;
use crate::game::turn::Direction;

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Take a seat at the table.
    Join {
        /// Reconnecting clients supply their previous id (UUID string);
        /// otherwise the server assigns a fresh one.
        player_id: Option<String>,
    },

    /// Play a card, or commit a pending wild color choice.
    PlayCard {
        /// Hand position; omitted when committing a drawn wild.
        index: Option<usize>,
        /// Concrete color for a wild play.
        chosen_color: Option<Color>,
    },

    /// Draw from the pile.
    DrawCard,

    /// Leave the table.
    Leave,

    /// Ping for latency measurement.
    Ping { timestamp: u64 },
}

impl ClientMessage {
    /// Convert a gameplay message into the engine intent it carries.
    pub fn to_intent(&self) -> Option<PlayerIntent> {
        match self {
            ClientMessage::PlayCard {
                index,
                chosen_color,
            } => Some(PlayerIntent::PlayCard {
                index: *index,
                chosen_color: *chosen_color,
            }),
            ClientMessage::DrawCard => Some(PlayerIntent::DrawCard),
            _ => None,
        }
    }
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Seat assignment after a successful join.
    SeatAssigned {
        /// The id the server knows this client by (UUID string).
        player_id: String,
        /// Seat index at the table.
        seat: usize,
    },

    /// Full table snapshot (sent after every visible mutation).
    Table(TableView),

    /// A wild awaits this client's color choice. Unicast to the owner.
    WildChoiceRequired {
        /// Where the card is held meanwhile.
        origin: WildOriginKind,
    },

    /// The attempted play was rejected by the rules.
    InvalidPlay {
        /// Human-readable reason.
        reason: String,
    },

    /// A round just ended.
    RoundWon {
        /// Winner's id (UUID string).
        winner: String,
    },

    /// Pong response.
    Pong { timestamp: u64, server_time: u64 },

    /// Error message.
    Error(ServerError),

    /// Server is shutting down.
    Shutdown { reason: String },
}

/// Server error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Message arrived before a seat was taken.
    NotSeated,
    /// The table has no free seat.
    TableFull,
    /// This connection already holds a seat.
    AlreadySeated,
    /// The message could not be parsed.
    MalformedMessage,
    /// Server is at its connection limit.
    ServerOverloaded,
    /// Internal error.
    InternalError,
}

// =============================================================================
// TABLE VIEW
// =============================================================================

/// A full snapshot of the table, as broadcast to every client.
///
/// Clients render only their own hand; the snapshot is identical for all
/// so a single serialization serves every connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    /// Lifecycle phase.
    pub phase: TablePhase,
    /// Seat roster in play order (UUID strings).
    pub seats: Vec<String>,
    /// Hands per seat, parallel to `seats`.
    pub hands: Vec<Vec<Card>>,
    /// Top of the discard pile.
    pub discard_top: Option<Card>,
    /// Color non-wild plays must match.
    pub active_color: Option<Color>,
    /// Accumulated forced-draw penalty.
    pub draw_stack: u32,
    /// Index of the seat holding the turn.
    pub current_seat: usize,
    /// Direction of play.
    pub direction: Direction,
    /// Cards left in the draw pile.
    pub deck_len: usize,
    /// Seat index of an outstanding wild choice's owner, if any.
    pub pending_seat: Option<usize>,
}

impl TableView {
    /// Snapshot the authoritative state.
    pub fn from_state(state: &TableState) -> Self {
        let hands = state
            .seats
            .iter()
            .map(|id| {
                state
                    .hand(*id)
                    .map(|h| h.iter().copied().collect())
                    .unwrap_or_default()
            })
            .collect();

        Self {
            phase: state.phase,
            seats: state.seats.iter().map(PlayerId::to_uuid_string).collect(),
            hands,
            discard_top: state.discard_top,
            active_color: state.active_color,
            draw_stack: state.draw_stack,
            current_seat: state.turn.current,
            direction: state.turn.direction,
            deck_len: state.deck.len(),
            pending_seat: state
                .pending_wild
                .as_ref()
                .and_then(|p| state.seat_of(p.owner)),
        }
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary. Flat payloads only; tagged enums stay JSON.
    pub fn view_to_bytes(view: &TableView) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(view)
    }

    /// Deserialize a binary snapshot.
    pub fn view_from_bytes(data: &[u8]) -> Result<TableView, bincode::Error> {
        bincode::deserialize(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::card::Value;
    use crate::game::state::Hand;

    #[test]
    fn test_client_message_json_roundtrip() {
        let msg = ClientMessage::PlayCard {
            index: Some(3),
            chosen_color: Some(Color::Green),
        };

        let json = msg.to_json().unwrap();
        let parsed = ClientMessage::from_json(&json).unwrap();

        if let ClientMessage::PlayCard {
            index,
            chosen_color,
        } = parsed
        {
            assert_eq!(index, Some(3));
            assert_eq!(chosen_color, Some(Color::Green));
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_client_message_to_intent() {
        let intent = ClientMessage::DrawCard.to_intent();
        assert_eq!(intent, Some(PlayerIntent::DrawCard));

        let intent = ClientMessage::Ping { timestamp: 1 }.to_intent();
        assert!(intent.is_none());
    }

    #[test]
    fn test_server_message_json_roundtrip() {
        let msg = ServerMessage::WildChoiceRequired {
            origin: WildOriginKind::FromDraw {
                card: Card::wild(Value::Draw4),
            },
        };

        let json = msg.to_json().unwrap();
        let parsed = ServerMessage::from_json(&json).unwrap();

        if let ServerMessage::WildChoiceRequired {
            origin: WildOriginKind::FromDraw { card },
        } = parsed
        {
            assert_eq!(card.value, Value::Draw4);
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_error_codes() {
        let msg = ServerMessage::Error(ServerError {
            code: ErrorCode::NotSeated,
            message: "join first".to_string(),
        });
        let json = msg.to_json().unwrap();
        assert!(json.contains("not_seated"));
    }

    #[test]
    fn test_table_view_snapshot() {
        let mut state = TableState::new(5);
        let a = PlayerId::new([1; 16]);
        let b = PlayerId::new([2; 16]);
        for id in [a, b] {
            state.seats.push(id);
            state.hands.insert(id, Hand::new());
        }
        state
            .hand_mut(a)
            .unwrap()
            .push(Card::new(Color::Red, Value::Number(5)));
        state.discard_top = Some(Card::new(Color::Blue, Value::Number(2)));
        state.active_color = Some(Color::Blue);
        state.draw_stack = 4;

        let view = TableView::from_state(&state);
        assert_eq!(view.seats.len(), 2);
        assert_eq!(view.hands[0].len(), 1);
        assert_eq!(view.hands[1].len(), 0);
        assert_eq!(view.active_color, Some(Color::Blue));
        assert_eq!(view.draw_stack, 4);
        assert_eq!(view.pending_seat, None);
        assert_eq!(view.seats[0], a.to_uuid_string());
    }

    #[test]
    fn test_table_view_binary_roundtrip() {
        let state = TableState::new(5);
        let view = TableView::from_state(&state);

        let bytes = ServerMessage::view_to_bytes(&view).unwrap();
        let parsed = ServerMessage::view_from_bytes(&bytes).unwrap();
        assert_eq!(parsed.seats.len(), 0);
        assert_eq!(parsed.deck_len, 0);
    }
}
