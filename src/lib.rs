//! # Wildstack Table Server
//!
//! Authoritative game-state engine for Wildstack, a turn-based stacking
//! card game with escalating draw penalties and wild color selection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WILDSTACK SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── card.rs     - Card identity, deck construction          │
//! │  ├── rules.rs    - Pure play-legality checks                 │
//! │  ├── turn.rs     - Turn order, direction, skip/reverse       │
//! │  ├── state.rs    - Table aggregate and pending wild state    │
//! │  ├── draw.rs     - Draw resolution and reshuffle             │
//! │  ├── table.rs    - Intent handling and table lifecycle       │
//! │  └── events.rs   - Events produced by intent processing      │
//! │                                                              │
//! │  network/        - Networking (non-deterministic)            │
//! │  ├── server.rs   - WebSocket server                          │
//! │  ├── protocol.rs - Message types                             │
//! │  └── session.rs  - The single shared table session           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authority Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic** and own every
//! rule of the game:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies in game logic
//! - All randomness from seeded Xorshift128+
//!
//! Every client intent is processed to completion (validate, mutate,
//! broadcast) before the next one begins; the table state is the single
//! source of truth for all connected participants.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use game::card::{Card, Color, Deck, Value};
pub use game::state::{PlayerId, TablePhase, TableState};
pub use game::table::{IntentError, PlayerIntent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cards dealt to each seat at the start of a round.
pub const CARDS_PER_HAND: usize = 7;

/// Maximum number of seats at the table.
pub const MAX_SEATS: usize = 4;

/// Minimum roster size before a round is dealt.
pub const MIN_PLAYERS_TO_DEAL: usize = 2;
