//! Table Lifecycle and Intent Handling
//!
//! The single entry point for every participant intent: ownership check,
//! legality check, mutation, and the events the network layer turns into
//! broadcasts. Also owns joins, leaves, dealing, win detection and the
//! immediate redeal.

use crate::game::card::{Card, Color, Deck};
use crate::game::draw::{draw_one, forced_multi_draw};
use crate::game::events::{TableEvent, WildOriginKind};
use crate::game::rules::is_playable;
use crate::game::state::{Hand, PendingWild, PlayerId, TablePhase, TableState, WildOrigin};
use crate::{CARDS_PER_HAND, MAX_SEATS, MIN_PLAYERS_TO_DEAL};

// =============================================================================
// INTENTS
// =============================================================================

/// An intent submitted by a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerIntent {
    /// Play the card at `index`, or commit a pending wild when `index`
    /// is `None`. `chosen_color` resolves a wild's color, either inline
    /// with the play or as the commit of a pending choice.
    PlayCard {
        /// Hand position, `None` for the pending drawn card
        index: Option<usize>,
        /// Concrete color for a wild play
        chosen_color: Option<Color>,
    },
    /// Draw from the pile (absorbs the penalty stack when one is active).
    DrawCard,
}

/// Why an intent was not applied.
///
/// Silent variants are protocol violations: the table ignores them
/// without a reply, so an out-of-turn actor learns nothing. Only
/// [`IntentError::IllegalPlay`] is surfaced to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// Sender does not hold the current turn.
    #[error("not this player's turn")]
    NotYourTurn,

    /// No round is in progress.
    #[error("no round in progress")]
    NotInProgress,

    /// Index outside the sender's hand.
    #[error("no card at index {0}")]
    BadIndex(usize),

    /// A wild color choice is outstanding and blocks this intent.
    #[error("a wild color choice is pending")]
    ChoicePending,

    /// A commit arrived with no choice outstanding.
    #[error("no wild color choice is pending")]
    NoPendingChoice,

    /// A pending-wild commit arrived without a usable color.
    #[error("wild commit requires a concrete color")]
    MissingColor,

    /// The card fails the legality rules.
    #[error("card is not playable")]
    IllegalPlay,

    /// Every seat is taken.
    #[error("table is full")]
    TableFull,

    /// Sender already holds a seat.
    #[error("already seated")]
    AlreadySeated,
}

impl IntentError {
    /// True when the sender should receive an explicit rejection notice.
    /// Everything else is ignored without a reply.
    pub fn notifies_sender(&self) -> bool {
        matches!(self, IntentError::IllegalPlay)
    }
}

// =============================================================================
// ROSTER
// =============================================================================

/// Seat a new participant.
///
/// Deals a fresh round when this brings a waiting table to two seats.
/// A participant joining a live round is dealt a starting hand from the
/// pile and enters the rotation at the last seat.
pub fn join(state: &mut TableState, player: PlayerId) -> Result<Vec<TableEvent>, IntentError> {
    if state.seat_of(player).is_some() {
        return Err(IntentError::AlreadySeated);
    }
    if state.seat_count() >= MAX_SEATS {
        return Err(IntentError::TableFull);
    }

    state.seats.push(player);
    state.hands.insert(player, Hand::new());

    let mut events = vec![TableEvent::SeatJoined {
        player,
        seat: state.seat_count() - 1,
    }];

    match state.phase {
        TablePhase::Waiting => {
            if state.seat_count() >= MIN_PLAYERS_TO_DEAL {
                deal(state);
                events.push(TableEvent::RoundDealt {
                    seats: state.seat_count(),
                });
            }
        }
        TablePhase::InProgress => {
            let mut count = 0;
            for _ in 0..CARDS_PER_HAND {
                match draw_one(state) {
                    Some(card) => {
                        if let Some(hand) = state.hand_mut(player) {
                            hand.push(card);
                            count += 1;
                        }
                    }
                    None => break,
                }
            }
            events.push(TableEvent::CardsDrawn { player, count });
        }
    }

    Ok(events)
}

/// Remove a participant (explicit leave or transport disconnect).
///
/// Their cards, including a pending drawn wild, return to the bottom of
/// the pile so the in-play multiset stays intact. A pending wild choice
/// they owned is forfeited. Dropping below two seats clears the round.
pub fn leave(state: &mut TableState, player: PlayerId) -> Vec<TableEvent> {
    let Some(seat) = state.seat_of(player) else {
        return Vec::new();
    };

    let mut events = vec![TableEvent::SeatLeft { player }];

    // Forfeit an outstanding choice; a drawn wild goes back to the pile.
    if let Some(pending) = &state.pending_wild {
        if pending.owner == player {
            if let Some(PendingWild {
                origin: WildOrigin::FromDraw { card },
                ..
            }) = state.pending_wild.take()
            {
                state.deck.place_bottom(card);
            }
        }
    }

    if let Some(mut hand) = state.hands.remove(&player) {
        for card in hand.take_all() {
            state.deck.place_bottom(card);
        }
    }

    state.seats.remove(seat);
    state.turn.seat_removed(seat, state.seat_count());

    if state.phase == TablePhase::InProgress && state.seat_count() < MIN_PLAYERS_TO_DEAL {
        state.clear_round();
        events.push(TableEvent::TableReset);
    }

    events
}

// =============================================================================
// DEALING
// =============================================================================

/// Deal a fresh round: new shuffled deck, seven cards per seat in join
/// order, then the first discard.
///
/// The first discard must be non-wild so the active color is defined at
/// start: a popped wild goes back into the pile and the pile is
/// reshuffled before popping again, so no card is lost.
fn deal(state: &mut TableState) {
    let mut deck = Deck::full();
    deck.shuffle(&mut state.rng);

    state.discard_history.clear();
    state.draw_stack = 0;
    state.pending_wild = None;
    state.turn.reset();

    let seats = state.seats.clone();
    state.hands.clear();
    for id in &seats {
        let mut hand = Hand::new();
        for _ in 0..CARDS_PER_HAND {
            if let Some(card) = deck.draw() {
                hand.push(card);
            }
        }
        state.hands.insert(*id, hand);
    }

    loop {
        match deck.draw() {
            Some(card) if !card.is_wild() => {
                state.discard_top = Some(card);
                state.active_color = Some(card.color);
                break;
            }
            Some(wild) => {
                deck.place_bottom(wild);
                deck.shuffle(&mut state.rng);
            }
            None => {
                state.discard_top = None;
                state.active_color = None;
                break;
            }
        }
    }

    state.deck = deck;
    state.phase = TablePhase::InProgress;
}

// =============================================================================
// INTENT HANDLING
// =============================================================================

/// Apply one intent: validate, mutate, report.
///
/// Processing is atomic with respect to other intents; the caller holds
/// the table exclusively for the whole call.
pub fn apply_intent(
    state: &mut TableState,
    sender: PlayerId,
    intent: PlayerIntent,
) -> Result<Vec<TableEvent>, IntentError> {
    if state.phase != TablePhase::InProgress {
        return Err(IntentError::NotInProgress);
    }

    match intent {
        PlayerIntent::PlayCard {
            index,
            chosen_color,
        } => handle_play(state, sender, index, chosen_color),
        PlayerIntent::DrawCard => handle_draw(state, sender),
    }
}

fn handle_play(
    state: &mut TableState,
    sender: PlayerId,
    index: Option<usize>,
    chosen_color: Option<Color>,
) -> Result<Vec<TableEvent>, IntentError> {
    if let Some(pending) = &state.pending_wild {
        if pending.owner != sender {
            return Err(IntentError::ChoicePending);
        }
        let color = chosen_color
            .filter(|c| c.is_concrete())
            .ok_or(IntentError::MissingColor)?;
        return commit_wild(state, sender, color);
    }

    if !state.is_current(sender) {
        return Err(IntentError::NotYourTurn);
    }

    // Without a pending choice the sentinel index has no referent.
    let index = index.ok_or(IntentError::NoPendingChoice)?;

    let hand = state.hand(sender).ok_or(IntentError::NotYourTurn)?;
    let card = *hand.get(index).ok_or(IntentError::BadIndex(index))?;

    let top = state.discard_top.ok_or(IntentError::NotInProgress)?;
    let active_color = state.active_color.unwrap_or(top.color);
    if !is_playable(&card, &top, active_color, state.draw_stack) {
        return Err(IntentError::IllegalPlay);
    }

    if card.is_wild() {
        match chosen_color.filter(|c| c.is_concrete()) {
            Some(color) => {
                let mut card = state
                    .hand_mut(sender)
                    .and_then(|h| h.remove(index))
                    .ok_or(IntentError::BadIndex(index))?;
                card.repaint(color);
                Ok(finish_play_from_hand(state, sender, card))
            }
            None => {
                // Legality confirmed, color unknown: suspend the table.
                state.pending_wild = Some(PendingWild {
                    owner: sender,
                    origin: WildOrigin::FromHand { index },
                });
                Ok(vec![TableEvent::WildChoiceRequired {
                    player: sender,
                    origin: WildOriginKind::FromHand { index },
                }])
            }
        }
    } else {
        let card = state
            .hand_mut(sender)
            .and_then(|h| h.remove(index))
            .ok_or(IntentError::BadIndex(index))?;
        Ok(finish_play_from_hand(state, sender, card))
    }
}

/// Commit a pending wild: repaint, discard, apply effects, resume play.
fn commit_wild(
    state: &mut TableState,
    sender: PlayerId,
    color: Color,
) -> Result<Vec<TableEvent>, IntentError> {
    // Validate before taking so a malformed commit leaves the choice
    // outstanding.
    let origin = match &state.pending_wild {
        Some(pending) => pending.origin.clone(),
        None => return Err(IntentError::NoPendingChoice),
    };

    match origin {
        WildOrigin::FromHand { index } => {
            let mut card = state
                .hand_mut(sender)
                .and_then(|h| h.remove(index))
                .ok_or(IntentError::BadIndex(index))?;
            state.pending_wild = None;
            card.repaint(color);
            Ok(finish_play_from_hand(state, sender, card))
        }
        WildOrigin::FromDraw { mut card } => {
            state.pending_wild = None;
            card.repaint(color);
            state.discard_and_apply(card);
            // A drawn wild never occupied a hand slot, so it can never
            // empty one: no win check on this path.
            Ok(vec![TableEvent::CardPlayed {
                player: sender,
                card,
            }])
        }
    }
}

/// Discard a card played from a hand, then check for a win. A win is
/// announced and the table immediately redeals; there is no terminal
/// game-over state.
fn finish_play_from_hand(state: &mut TableState, player: PlayerId, card: Card) -> Vec<TableEvent> {
    state.discard_and_apply(card);

    let mut events = vec![TableEvent::CardPlayed { player, card }];

    let won = state.hand(player).is_some_and(Hand::is_empty);
    if won {
        events.push(TableEvent::RoundWon { winner: player });
        deal(state);
        events.push(TableEvent::RoundDealt {
            seats: state.seat_count(),
        });
    }

    events
}

fn handle_draw(state: &mut TableState, sender: PlayerId) -> Result<Vec<TableEvent>, IntentError> {
    if state.pending_wild.is_some() {
        return Err(IntentError::ChoicePending);
    }
    if !state.is_current(sender) {
        return Err(IntentError::NotYourTurn);
    }

    if state.draw_stack > 0 {
        let count = forced_multi_draw(state, sender);
        state.turn.advance(state.seat_count());
        return Ok(vec![TableEvent::CardsDrawn {
            player: sender,
            count,
        }]);
    }

    let Some(card) = draw_one(state) else {
        // Both the pile and the history are dry; the turn still passes.
        state.turn.advance(state.seat_count());
        return Ok(vec![TableEvent::CardsDrawn {
            player: sender,
            count: 0,
        }]);
    };

    let top = state.discard_top.ok_or(IntentError::NotInProgress)?;
    let active_color = state.active_color.unwrap_or(top.color);

    if is_playable(&card, &top, active_color, 0) {
        if card.is_wild() {
            // Defer: the card sits with the engine until the drawer
            // picks a color. No turn advance, nothing broadcast.
            state.pending_wild = Some(PendingWild {
                owner: sender,
                origin: WildOrigin::FromDraw { card },
            });
            Ok(vec![TableEvent::WildChoiceRequired {
                player: sender,
                origin: WildOriginKind::FromDraw { card },
            }])
        } else {
            // Auto-play: the card never enters the hand.
            state.discard_and_apply(card);
            Ok(vec![TableEvent::CardPlayed {
                player: sender,
                card,
            }])
        }
    } else {
        if let Some(hand) = state.hand_mut(sender) {
            hand.push(card);
        }
        state.turn.advance(state.seat_count());
        Ok(vec![TableEvent::CardsDrawn {
            player: sender,
            count: 1,
        }])
    }
}

// =============================================================================
// TESTS
// =============================================================================
