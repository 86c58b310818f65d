use crate::cards::Card;
use crate::engine::score::score_play_gameplay;
use crate::errors::EngineError;
use crate::events::Event;
use crate::state::{GameState, PLAY_SIZE};
use crate::types::{Action, Mode};

/// Validate an action against the current state. Never mutates; a failed
/// validation leaves the caller free to retry with a corrected action.
pub fn validate_action(state: &GameState, action: &Action) -> Result<(), EngineError> {
    if state.is_terminal() {
        return Err(EngineError::GameAlreadyEnded);
    }

    let indices = action.selected_indices();
    match action {
        Action::Play { .. } => {
            if indices.len() != PLAY_SIZE {
                return Err(EngineError::PlayRequiresFive { got: indices.len() });
            }
        }
        Action::Discard { .. } => {
            let n = indices.len();
            let max = state.hand.len().min(state.d_remaining as usize);
            if n < 1 {
                return Err(EngineError::DiscardSizeInvalid { got: n, max });
            }
            if n > state.d_remaining as usize {
                return Err(EngineError::DiscardBudgetExceeded {
                    requested: n,
                    d_remaining: state.d_remaining,
                });
            }
            if n > state.hand.len() {
                return Err(EngineError::DiscardSizeInvalid { got: n, max });
            }
        }
    }

    let hand_len = state.hand.len();
    let mut seen = [false; 16];
    for &i in indices {
        if i >= hand_len {
            return Err(EngineError::IndicesOutOfRange { index: i, hand_len });
        }
        if std::mem::replace(&mut seen[i], true) {
            return Err(EngineError::IndicesNotUnique { index: i });
        }
    }
    Ok(())
}

/// Apply an action as a pure transform: validates strictly, then returns
/// the successor state and the events describing what happened. The input
/// state is never mutated; on error it is returned untouched to the caller
/// by virtue of never having been cloned.
pub fn apply_action(
    state: &GameState,
    action: &Action,
) -> Result<(GameState, Vec<Event>), EngineError> {
    validate_action(state, action)?;
    let mut ns = state.clone();
    let events = transition(&mut ns, action);
    Ok((ns, events))
}

/// Remove the selected positions from the hand, preserving survivor order.
/// Indices refer to positions in the current hand, not card identities.
fn remove_indices_preserve_order(hand: &[Card], indices: &[usize]) -> (Vec<Card>, Vec<Card>) {
    let mut selected = [false; 16];
    for &i in indices {
        selected[i] = true;
    }
    let mut kept = Vec::with_capacity(hand.len());
    let mut removed = Vec::with_capacity(indices.len());
    for (i, card) in hand.iter().enumerate() {
        if selected[i] {
            removed.push(*card);
        } else {
            kept.push(*card);
        }
    }
    (kept, removed)
}

/// Draw n cards from the front of the remaining deck. Budgets guarantee the
/// deck can always satisfy the draw (at most 30 of 45 suffix cards leave).
fn draw_from_deck(deck: &mut Vec<Card>, n: usize) -> Vec<Card> {
    debug_assert!(n <= deck.len(), "deck underflow: need {n}, have {}", deck.len());
    deck.drain(..n).collect()
}

/// The transition proper. Fixed internal ordering: remove selected cards
/// first, then draw replacements from the deck suffix.
fn transition(state: &mut GameState, action: &Action) -> Vec<Event> {
    let (kept, removed) = remove_indices_preserve_order(&state.hand, action.selected_indices());
    let mut events = Vec::with_capacity(2);

    match action {
        Action::Play { .. } => {
            let played: [Card; 5] = [removed[0], removed[1], removed[2], removed[3], removed[4]];
            let (category, points) = score_play_gameplay(&played);

            let drawn = draw_from_deck(&mut state.deck, PLAY_SIZE);
            state.hand = kept;
            state.hand.extend_from_slice(&drawn);
            state.p_remaining -= 1;
            state.score_total += u64::from(points);

            events.push(Event::play_scored(
                category,
                points,
                &played,
                &drawn,
                state.p_remaining,
                state.score_total,
            ));

            if state.p_remaining == 0 {
                events.push(Event::game_ended(state.score_total));
                if state.mode == Mode::Challenge {
                    if let Some(target) = state.target_score {
                        if state.score_total >= target {
                            events.push(Event::game_passed(state.score_total, target));
                        } else {
                            events.push(Event::game_failed(state.score_total, target));
                        }
                    }
                }
            }
        }
        Action::Discard { .. } => {
            let n = removed.len();
            let drawn = draw_from_deck(&mut state.deck, n);
            state.hand = kept;
            state.hand.extend_from_slice(&drawn);
            state.d_remaining -= n as u8;

            events.push(Event::discard_performed(&removed, &drawn, state.d_remaining));
        }
    }

    state.history.push(action.clone());
    state.check_invariants();
    events
}
