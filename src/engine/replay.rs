use crate::engine::apply::apply_action;
use crate::errors::EngineError;
use crate::events::Event;
use crate::state::GameState;
use crate::types::{Action, Mode};

/// Reconstruct the state after the first `k` actions of `history` by
/// replaying from a fresh start. The returned state's history is truncated
/// at `k`: applying a new action afterwards extends from there and the
/// discarded suffix is gone — no branching timelines.
///
/// Session budgets (hints, jumps) are bookkeeping outside this path and
/// are never refunded by jumping.
pub fn jump(
    seed: u64,
    mode: Mode,
    target_score: Option<u64>,
    history: &[Action],
    k: usize,
) -> Result<(GameState, Vec<Event>), EngineError> {
    if k > history.len() {
        return Err(EngineError::JumpNotAllowed {
            requested: k,
            history_len: history.len(),
        });
    }
    let (mut state, _) = GameState::from_seed(seed, mode, target_score);
    for action in &history[..k] {
        let (next, _) = apply_action(&state, action)?;
        state = next;
    }
    Ok((state, vec![Event::game_jumped(k)]))
}

/// Replay the full action log from the seed. Equivalent to
/// `jump(seed, history, history.len())` without the jump event.
pub fn replay(
    seed: u64,
    mode: Mode,
    target_score: Option<u64>,
    history: &[Action],
) -> Result<GameState, EngineError> {
    jump(seed, mode, target_score, history, history.len()).map(|(state, _)| state)
}
