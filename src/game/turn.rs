//! Turn Order
//!
//! Tracks whose turn it is and in which direction play proceeds.

use serde::{Deserialize, Serialize};

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Seat order as joined
    #[default]
    Forward,
    /// Reversed seat order
    Backward,
}

impl Direction {
    /// Flip the direction.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Step to apply to the current seat index.
    #[inline]
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Whose turn it is, and which way play moves.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TurnOrder {
    /// Index of the current seat
    pub current: usize,
    /// Direction of play
    pub direction: Direction,
}

impl TurnOrder {
    /// Reset to the first seat, forward direction.
    pub fn reset(&mut self) {
        self.current = 0;
        self.direction = Direction::Forward;
    }

    /// Move to the next seat.
    ///
    /// No-op on an empty roster.
    pub fn advance(&mut self, seats: usize) {
        if seats == 0 {
            self.current = 0;
            return;
        }
        let next = self.current as i64 + self.direction.step();
        self.current = next.rem_euclid(seats as i64) as usize;
    }

    /// Skip one seat: the normal end-of-turn advance plus one extra.
    pub fn skip(&mut self, seats: usize) {
        self.advance(seats);
        self.advance(seats);
    }

    /// Apply a Reverse play.
    ///
    /// With exactly two seats a reversal is a no-op equivalent to passing
    /// back, so Reverse acts as a Skip instead of flipping direction.
    pub fn reverse(&mut self, seats: usize) {
        if seats == 2 {
            self.skip(seats);
        } else {
            self.direction = self.direction.flipped();
            self.advance(seats);
        }
    }

    /// Clamp the current index into range after a roster change.
    ///
    /// Called when a seat at `removed` was vacated.
    pub fn seat_removed(&mut self, removed: usize, seats: usize) {
        if seats == 0 {
            self.current = 0;
            return;
        }
        if removed < self.current {
            self.current -= 1;
        }
        if self.current >= seats {
            self.current = 0;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advance_wraps_forward() {
        let mut turn = TurnOrder::default();
        turn.advance(3);
        assert_eq!(turn.current, 1);
        turn.advance(3);
        turn.advance(3);
        assert_eq!(turn.current, 0);
    }

    #[test]
    fn test_advance_wraps_backward() {
        let mut turn = TurnOrder {
            current: 0,
            direction: Direction::Backward,
        };
        turn.advance(4);
        assert_eq!(turn.current, 3);
        turn.advance(4);
        assert_eq!(turn.current, 2);
    }

    #[test]
    fn test_skip_consumes_two_advances() {
        let mut turn = TurnOrder::default();
        turn.skip(4);
        assert_eq!(turn.current, 2);

        // With two seats, a skip returns play to the same seat.
        let mut turn = TurnOrder::default();
        turn.skip(2);
        assert_eq!(turn.current, 0);
    }

    #[test]
    fn test_reverse_flips_with_three_seats() {
        let mut turn = TurnOrder {
            current: 1,
            direction: Direction::Forward,
        };
        turn.reverse(3);
        assert_eq!(turn.direction, Direction::Backward);
        assert_eq!(turn.current, 0);
    }

    #[test]
    fn test_two_player_reverse_acts_as_skip() {
        let mut reversed = TurnOrder::default();
        reversed.reverse(2);

        let mut skipped = TurnOrder::default();
        skipped.skip(2);

        assert_eq!(reversed.current, skipped.current);
        assert_eq!(reversed.direction, Direction::Forward);
    }

    #[test]
    fn test_seat_removed_clamps() {
        // Removing a seat before the current one shifts it down.
        let mut turn = TurnOrder {
            current: 2,
            direction: Direction::Forward,
        };
        turn.seat_removed(0, 3);
        assert_eq!(turn.current, 1);

        // Removing the last seat while current pointed at it wraps to 0.
        let mut turn = TurnOrder {
            current: 2,
            direction: Direction::Forward,
        };
        turn.seat_removed(2, 2);
        assert_eq!(turn.current, 0);

        // Empty roster resets.
        let mut turn = TurnOrder {
            current: 1,
            direction: Direction::Forward,
        };
        turn.seat_removed(0, 0);
        assert_eq!(turn.current, 0);
    }

    proptest! {
        #[test]
        fn prop_advance_stays_in_range(start in 0..8usize, seats in 1..8usize, steps in 0..32usize, backward: bool) {
            let mut turn = TurnOrder {
                current: start % seats,
                direction: if backward { Direction::Backward } else { Direction::Forward },
            };
            for _ in 0..steps {
                turn.advance(seats);
                prop_assert!(turn.current < seats);
            }
        }

        #[test]
        fn prop_seat_removed_stays_in_range(current in 0..8usize, removed in 0..8usize, seats in 0..8usize) {
            let mut turn = TurnOrder {
                current,
                direction: Direction::Forward,
            };
            turn.seat_removed(removed, seats);
            prop_assert!(seats == 0 && turn.current == 0 || turn.current < seats);
        }
    }
}
