//! Play Legality
//!
//! The pure legality check for a card against the current table. Total
//! and side-effect-free so it can be tested without turn or broadcast
//! machinery.

use crate::game::card::{Card, Color};

/// Decide whether `card` may be played.
///
/// With an active draw stack only a penalty card of equal or higher rank
/// than the discard top may be played (2 < 4 < 6 < 10); escalation is
/// allowed, de-escalation never, and every non-penalty card - wilds
/// included - is illegal.
///
/// With no stack, a wild-family card is always legal and any other card
/// is legal when its color matches the active color or its value matches
/// the discard top.
pub fn is_playable(card: &Card, top: &Card, active_color: Color, draw_stack: u32) -> bool {
    if draw_stack > 0 {
        return match (card.value.penalty_rank(), top.value.penalty_rank()) {
            (Some(rank), Some(top_rank)) => rank >= top_rank,
            _ => false,
        };
    }

    if card.is_wild() {
        return true;
    }

    card.color == active_color || card.value == top.value
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::card::Value;
    use proptest::prelude::*;

    fn red(value: Value) -> Card {
        Card::new(Color::Red, value)
    }

    #[test]
    fn test_color_match() {
        let top = red(Value::Number(5));
        assert!(is_playable(
            &Card::new(Color::Red, Value::Number(9)),
            &top,
            Color::Red,
            0
        ));
        assert!(!is_playable(
            &Card::new(Color::Blue, Value::Number(9)),
            &top,
            Color::Red,
            0
        ));
    }

    #[test]
    fn test_value_match_across_colors() {
        let top = red(Value::Number(5));
        assert!(is_playable(
            &Card::new(Color::Blue, Value::Number(5)),
            &top,
            Color::Red,
            0
        ));
        assert!(is_playable(
            &Card::new(Color::Blue, Value::Skip),
            &red(Value::Skip),
            Color::Red,
            0
        ));
    }

    #[test]
    fn test_active_color_overrides_top_color() {
        // A repainted wild on top: legality follows the chosen color, not
        // the card's printed color.
        let mut top = Card::wild(Value::Wild);
        top.repaint(Color::Green);
        assert!(is_playable(
            &Card::new(Color::Green, Value::Number(1)),
            &top,
            Color::Green,
            0
        ));
        assert!(!is_playable(
            &Card::new(Color::Red, Value::Number(1)),
            &top,
            Color::Green,
            0
        ));
    }

    #[test]
    fn test_wild_always_legal_without_stack() {
        let top = red(Value::Number(5));
        for value in [Value::Wild, Value::Draw4, Value::Draw6, Value::Draw10] {
            assert!(is_playable(&Card::wild(value), &top, Color::Red, 0));
        }
    }

    #[test]
    fn test_stack_escalation_law() {
        let top = red(Value::Draw2);

        // Draw6 on an active Draw2 stack: legal escalation.
        assert!(is_playable(&Card::wild(Value::Draw6), &top, Color::Red, 2));

        // Equal rank absorbs onto the stack.
        assert!(is_playable(
            &Card::new(Color::Blue, Value::Draw2),
            &top,
            Color::Red,
            2
        ));

        // Draw2 on an active Draw6 stack: de-escalation, illegal.
        let top6 = Card::wild(Value::Draw6);
        assert!(!is_playable(
            &Card::new(Color::Blue, Value::Draw2),
            &top6,
            Color::Red,
            6
        ));

        // Skip while any stack is active: illegal.
        assert!(!is_playable(&red(Value::Skip), &top, Color::Red, 2));

        // An unrelated plain wild is illegal under a stack.
        assert!(!is_playable(&Card::wild(Value::Wild), &top, Color::Red, 2));
    }

    #[test]
    fn test_matching_color_illegal_under_stack() {
        let top = red(Value::Draw2);
        assert!(!is_playable(&red(Value::Number(2)), &top, Color::Red, 2));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0..=9u8).prop_map(Value::Number),
            Just(Value::Skip),
            Just(Value::Reverse),
            Just(Value::Draw2),
            Just(Value::Draw4),
            Just(Value::Draw6),
            Just(Value::Draw10),
            Just(Value::Wild),
        ]
    }

    fn arb_card() -> impl Strategy<Value = Card> {
        (arb_value(), 0..5usize).prop_map(|(value, c)| {
            let color = if value.is_wild() {
                Color::Wild
            } else {
                [Color::Red, Color::Blue, Color::Green, Color::Yellow][c % 4]
            };
            Card::new(color, value)
        })
    }

    proptest! {
        #[test]
        fn prop_total_over_all_inputs(card in arb_card(), top in arb_card(), stack in 0..40u32) {
            // Must never panic, whatever the combination.
            let _ = is_playable(&card, &top, Color::Red, stack);
        }

        #[test]
        fn prop_non_penalty_never_legal_under_stack(card in arb_card(), top in arb_card(), stack in 1..40u32) {
            if card.value.penalty_rank().is_none() {
                prop_assert!(!is_playable(&card, &top, Color::Red, stack));
            }
        }

        #[test]
        fn prop_escalation_never_descends(card in arb_card(), top in arb_card(), stack in 1..40u32) {
            if let (Some(rank), Some(top_rank)) = (card.value.penalty_rank(), top.value.penalty_rank()) {
                prop_assert_eq!(is_playable(&card, &top, Color::Red, stack), rank >= top_rank);
            }
        }
    }
}
