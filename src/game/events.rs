//! Table Events
//!
//! Events produced by intent processing. The network layer maps them to
//! broadcast or unicast messages; the game layer never talks to sockets.

use serde::{Deserialize, Serialize};

use crate::game::card::Card;
use crate::game::state::PlayerId;

/// Origin of a pending wild choice, as reported to the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum WildOriginKind {
    /// The wild sits in the owner's hand at this index.
    FromHand {
        /// Hand position of the wild card
        index: usize,
    },
    /// The wild was just drawn and is held by the engine.
    FromDraw {
        /// The drawn card, shown only to the owner
        card: Card,
    },
}

/// An event emitted while processing one intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    /// A participant took a seat.
    SeatJoined {
        /// Who joined
        player: PlayerId,
        /// Their seat index
        seat: usize,
    },

    /// A participant left the table.
    SeatLeft {
        /// Who left
        player: PlayerId,
    },

    /// A fresh round was dealt.
    RoundDealt {
        /// Seats dealt into the round
        seats: usize,
    },

    /// A card landed on the discard pile.
    CardPlayed {
        /// Who played it
        player: PlayerId,
        /// The card as discarded (wilds already repainted)
        card: Card,
    },

    /// A participant drew cards into their hand.
    CardsDrawn {
        /// Who drew
        player: PlayerId,
        /// How many cards actually arrived
        count: usize,
    },

    /// A wild card is waiting for its owner to choose a color.
    ///
    /// Unicast to the owner only; nothing visible changed for anyone
    /// else yet.
    WildChoiceRequired {
        /// The seat that must choose
        player: PlayerId,
        /// Where the card is held meanwhile
        origin: WildOriginKind,
    },

    /// A hand emptied; the round is over.
    RoundWon {
        /// The winner
        winner: PlayerId,
    },

    /// The table dropped back to waiting (roster below two seats).
    TableReset,
}

impl TableEvent {
    /// True when the event reflects a table mutation every participant
    /// must see. `WildChoiceRequired` is private to its owner: the new
    /// discard top is not broadcast until the choice commits.
    pub fn is_public(&self) -> bool {
        !matches!(self, TableEvent::WildChoiceRequired { .. })
    }
}
