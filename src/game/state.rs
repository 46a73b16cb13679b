//! Table State Definitions
//!
//! The single authoritative aggregate for the shared table.
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::game::card::{Card, Color, Deck, Value};
use crate::game::turn::TurnOrder;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique participant identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create a fresh random id for a new connection.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().into_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Short hex form for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

// =============================================================================
// HAND
// =============================================================================

/// A player's hand: ordered, oldest draws first. Index addressing is
/// positional and shifts on removal.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Create an empty hand.
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Append a drawn card.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Look at the card at `index`.
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Remove and return the card at `index`; later cards shift down.
    pub fn remove(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Take every card out of the hand.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// Number of cards held.
    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when the hand has emptied (the win condition).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over the held cards.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

// =============================================================================
// PENDING WILD CHOICE
// =============================================================================

/// Where a pending wild card currently lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WildOrigin {
    /// Still in the owner's hand at this index; removed on commit.
    FromHand {
        /// Position in the owner's hand
        index: usize,
    },
    /// Just drawn from the pile; held by the engine, in no hand and not
    /// in the deck, until the color commit discards it.
    FromDraw {
        /// The drawn card
        card: Card,
    },
}

/// A wild card whose playability is confirmed but whose color is not yet
/// chosen. At most one exists at a time; while it does, every other play
/// or draw intent from any seat is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWild {
    /// The seat that must choose the color
    pub owner: PlayerId,
    /// Where the card is held meanwhile
    pub origin: WildOrigin,
}

// =============================================================================
// TABLE PHASE
// =============================================================================

/// Lifecycle phase of the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TablePhase {
    /// Fewer than two seats; no cards dealt.
    #[default]
    Waiting,
    /// A round is live.
    InProgress,
}

// =============================================================================
// TABLE STATE
// =============================================================================

/// Complete state of the shared table.
///
/// Exclusively owned by the table lifecycle code; other components only
/// receive references for the duration of one intent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableState {
    /// Seats in join order
    pub seats: Vec<PlayerId>,

    /// Hands per seat (BTreeMap for deterministic iteration)
    pub hands: BTreeMap<PlayerId, Hand>,

    /// The draw pile
    pub deck: Deck,

    /// Top of the discard pile
    pub discard_top: Option<Card>,

    /// Superseded discards, kept only as the reshuffle source
    pub discard_history: Vec<Card>,

    /// Whose turn, which direction
    pub turn: TurnOrder,

    /// Accumulated forced-draw penalty
    pub draw_stack: u32,

    /// Color that non-wild plays must match
    pub active_color: Option<Color>,

    /// Outstanding wild color choice, if any
    pub pending_wild: Option<PendingWild>,

    /// Lifecycle phase
    pub phase: TablePhase,

    /// RNG seed (for replaying a table)
    pub rng_seed: u64,

    /// Deterministic RNG state
    #[serde(skip)]
    pub rng: DeterministicRng,
}

impl TableState {
    /// Create an empty waiting table.
    pub fn new(rng_seed: u64) -> Self {
        Self {
            seats: Vec::new(),
            hands: BTreeMap::new(),
            deck: Deck::new(),
            discard_top: None,
            discard_history: Vec::new(),
            turn: TurnOrder::default(),
            draw_stack: 0,
            active_color: None,
            pending_wild: None,
            phase: TablePhase::Waiting,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
        }
    }

    /// Number of occupied seats.
    #[inline]
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// The seat whose turn it is.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.seats.get(self.turn.current).copied()
    }

    /// True when `id` holds the current turn.
    pub fn is_current(&self, id: PlayerId) -> bool {
        self.current_player() == Some(id)
    }

    /// Seat index of a participant.
    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| *s == id)
    }

    /// A participant's hand.
    pub fn hand(&self, id: PlayerId) -> Option<&Hand> {
        self.hands.get(&id)
    }

    /// A participant's hand, mutably.
    pub fn hand_mut(&mut self, id: PlayerId) -> Option<&mut Hand> {
        self.hands.get_mut(&id)
    }

    /// Clear the live round back to an undealt table, keeping the roster.
    pub fn clear_round(&mut self) {
        self.hands.clear();
        for id in &self.seats {
            self.hands.insert(*id, Hand::new());
        }
        self.deck = Deck::new();
        self.discard_top = None;
        self.discard_history.clear();
        self.turn.reset();
        self.draw_stack = 0;
        self.active_color = None;
        self.pending_wild = None;
        self.phase = TablePhase::Waiting;
    }

    /// Discard `card` and apply its own effects: active color, penalty
    /// escalation, and the turn consequences of Skip and Reverse.
    ///
    /// The card's color must be concrete by the time it lands here (wilds
    /// are repainted first). The superseded top goes to the history
    /// buffer, which exists only to feed reshuffles.
    pub fn discard_and_apply(&mut self, card: Card) {
        debug_assert!(card.color.is_concrete());

        if let Some(old_top) = self.discard_top.replace(card) {
            self.discard_history.push(old_top);
        }
        self.active_color = Some(card.color);

        if let Some(rank) = card.value.penalty_rank() {
            self.draw_stack += rank as u32;
        }

        let seats = self.seat_count();
        match card.value {
            Value::Skip => self.turn.skip(seats),
            Value::Reverse => self.turn.reverse(seats),
            _ => self.turn.advance(seats),
        }
    }

    /// Count every card still in play: deck, hands, discard top and
    /// history, and a pending drawn card. Used to assert conservation.
    pub fn cards_in_play(&self) -> usize {
        let pending = match &self.pending_wild {
            Some(PendingWild {
                origin: WildOrigin::FromDraw { .. },
                ..
            }) => 1,
            _ => 0,
        };
        self.deck.len()
            + self.hands.values().map(Hand::len).sum::<usize>()
            + usize::from(self.discard_top.is_some())
            + self.discard_history.len()
            + pending
    }
}

// =============================================================================
// TESTS
// =============================================================================
