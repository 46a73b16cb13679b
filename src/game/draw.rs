//! Draw Resolution
//!
//! Drawing from the pile, reshuffling superseded discards back in when
//! the pile runs dry, and the forced multi-draw that absorbs an active
//! penalty stack.

use crate::game::card::Card;
use crate::game::state::{PlayerId, TableState};

/// Draw one card, reshuffling the discard history into the pile first if
/// the pile is empty.
///
/// Returns `None` only when the pile and the history are both exhausted.
/// Hands are never touched as a reshuffle source.
pub fn draw_one(state: &mut TableState) -> Option<Card> {
    if state.deck.is_empty() && !state.discard_history.is_empty() {
        let recycled = std::mem::take(&mut state.discard_history);
        state.deck.refill(recycled);
        state.deck.shuffle(&mut state.rng);
    }
    state.deck.draw()
}

/// Absorb the active penalty stack: draw exactly `draw_stack` cards into
/// the player's hand, one at a time, reshuffling as needed.
///
/// Stops short when both sources are exhausted; the stack resets either
/// way. Returns the number of cards actually drawn. None of the drawn
/// cards are offered for immediate play.
pub fn forced_multi_draw(state: &mut TableState, player: PlayerId) -> usize {
    let owed = state.draw_stack as usize;
    let mut drawn = 0;

    for _ in 0..owed {
        match draw_one(state) {
            Some(card) => {
                if let Some(hand) = state.hand_mut(player) {
                    hand.push(card);
                    drawn += 1;
                } else {
                    // No seat for this player; put the card back.
                    state.deck.place_bottom(card);
                    break;
                }
            }
            None => break,
        }
    }

    state.draw_stack = 0;
    drawn
}

// =============================================================================
// TESTS
// =============================================================================
