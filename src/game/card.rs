//! Card Identity and Deck Model
//!
//! Immutable card identity, full-deck construction, and the LIFO draw
//! pile. The only mutation a card ever sees is a wild being "repainted"
//! with its chosen color at discard time.

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;

// =============================================================================
// COLOR
// =============================================================================

/// Card color. `Wild` is the unassigned color of the wild family; it is
/// replaced by a concrete color when the card is repainted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Red
    Red,
    /// Blue
    Blue,
    /// Green
    Green,
    /// Yellow
    Yellow,
    /// Unassigned wild color
    Wild,
}

/// The four concrete colors, in deck-construction order.
pub const CONCRETE_COLORS: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

impl Color {
    /// True for the four playable colors, false for `Wild`.
    #[inline]
    pub fn is_concrete(self) -> bool {
        !matches!(self, Color::Wild)
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// Card face value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Numeric card 0-9
    Number(u8),
    /// Skip the next seat
    Skip,
    /// Flip play direction (acts as Skip with two seats)
    Reverse,
    /// Colored draw-two penalty
    Draw2,
    /// Wild draw-four penalty
    Draw4,
    /// Wild draw-six penalty
    Draw6,
    /// Wild draw-ten penalty
    Draw10,
    /// Plain wild, color choice only
    Wild,
}

impl Value {
    /// Penalty rank of a draw card, used to order legal escalation.
    ///
    /// `None` for every non-penalty value. Rank order is the draw count
    /// itself: 2 < 4 < 6 < 10. Escalation compares ranks, never
    /// de-escalates.
    #[inline]
    pub fn penalty_rank(self) -> Option<u8> {
        match self {
            Value::Draw2 => Some(2),
            Value::Draw4 => Some(4),
            Value::Draw6 => Some(6),
            Value::Draw10 => Some(10),
            Value::Number(_) | Value::Skip | Value::Reverse | Value::Wild => None,
        }
    }

    /// True for the wild family: cards dealt without a concrete color.
    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Value::Wild | Value::Draw4 | Value::Draw6 | Value::Draw10)
    }
}

// =============================================================================
// CARD
// =============================================================================

/// A single card.
///
/// Identity is fixed at construction. A wild card's `color` field is
/// overwritten in place exactly once, when its chooser assigns a concrete
/// color ("repainted", not a new entity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Current color (concrete, or `Wild` while unassigned)
    pub color: Color,
    /// Face value
    pub value: Value,
}

impl Card {
    /// Create a card.
    pub const fn new(color: Color, value: Value) -> Self {
        Self { color, value }
    }

    /// Create an unassigned wild-family card.
    pub const fn wild(value: Value) -> Self {
        Self {
            color: Color::Wild,
            value,
        }
    }

    /// True if this card belongs to the wild family, regardless of
    /// whether a color has been assigned yet.
    #[inline]
    pub fn is_wild(&self) -> bool {
        self.value.is_wild()
    }

    /// Assign a concrete color to a wild card.
    pub fn repaint(&mut self, color: Color) {
        debug_assert!(self.is_wild());
        debug_assert!(color.is_concrete());
        self.color = color;
    }
}

// =============================================================================
// DECK
// =============================================================================

/// The LIFO draw pile.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Build the full 116-card starting deck, unshuffled.
    ///
    /// Per concrete color: one 0, two each of 1-9, Skip, Reverse and
    /// Draw2. Plus four each of Wild, Draw4, Draw6 and Draw10.
    pub fn full() -> Self {
        let mut cards = Vec::with_capacity(116);

        for color in CONCRETE_COLORS {
            for n in 0..=9u8 {
                cards.push(Card::new(color, Value::Number(n)));
                if n != 0 {
                    cards.push(Card::new(color, Value::Number(n)));
                }
            }
            for value in [Value::Skip, Value::Reverse, Value::Draw2] {
                cards.push(Card::new(color, value));
                cards.push(Card::new(color, value));
            }
        }

        for _ in 0..4 {
            cards.push(Card::wild(Value::Wild));
            cards.push(Card::wild(Value::Draw4));
            cards.push(Card::wild(Value::Draw6));
            cards.push(Card::wild(Value::Draw10));
        }

        Self { cards }
    }

    /// Draw the top card.
    #[inline]
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Return a card to the bottom of the pile.
    pub fn place_bottom(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    /// Absorb a pile of cards (used when reshuffling discards back in).
    pub fn refill(&mut self, mut cards: Vec<Card>) {
        self.cards.append(&mut cards);
    }

    /// Uniform random permutation of the pile (Fisher-Yates).
    pub fn shuffle(&mut self, rng: &mut DeterministicRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Number of cards remaining.
    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when the pile is exhausted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over the remaining cards (bottom to top).
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
