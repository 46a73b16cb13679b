//! Game Logic Module
//!
//! All table rules and state transitions. 100% deterministic: given the
//! same seed and the same intent sequence, every table replays
//! identically.
//!
//! ## Module Structure
//!
//! - `card`: Cards, colors, values, the deck
//! - `rules`: The pure playability predicate
//! - `turn`: Turn order and direction
//! - `state`: The authoritative table aggregate
//! - `draw`: Draw resolution and pile reshuffling
//! - `table`: Intent handling, joins, leaves, dealing
//! - `events`: Events the network layer turns into messages

pub mod card;
pub mod rules;
pub mod turn;
pub mod state;
pub mod draw;
pub mod table;
pub mod events;

// Re-export key types
pub use card::{Card, Color, Deck, Value};
pub use events::{TableEvent, WildOriginKind};
pub use state::{Hand, PendingWild, PlayerId, TablePhase, TableState, WildOrigin};
pub use table::{apply_intent, join, leave, IntentError, PlayerIntent};
pub use turn::{Direction, TurnOrder};
