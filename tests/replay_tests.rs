use sevendraw::engine::apply::apply_action;
use sevendraw::{jump, replay, Action, EngineError, GameState, Mode};

fn scripted_log() -> Vec<Action> {
    vec![
        Action::discard(vec![0, 1, 2]),
        Action::play(vec![0, 1, 2, 3, 4]),
        Action::discard(vec![5]),
        Action::play(vec![0, 1, 2, 3, 4]),
        Action::play(vec![0, 1, 2, 3, 4]),
        Action::play(vec![0, 1, 2, 3, 4]),
    ]
}

fn step_live(seed: u64, log: &[Action]) -> GameState {
    let (mut state, _) = GameState::from_seed(seed, Mode::Practice, None);
    for action in log {
        let (next, _) = apply_action(&state, action).expect("legal scripted action");
        state = next;
    }
    state
}

#[test]
fn jump_equals_live_stepping() {
    // Replay-equivalence scenario: live stepping through the full log and
    // jumping to its end agree on everything observable.
    let log = scripted_log();
    let live = step_live(42, &log);
    let (jumped, events) = jump(42, Mode::Practice, None, &log, 6).expect("jump");

    assert_eq!(jumped.score_total(), live.score_total());
    assert_eq!(jumped.hand(), live.hand());
    assert_eq!(jumped.p_remaining(), live.p_remaining());
    assert_eq!(jumped.d_remaining(), live.d_remaining());
    assert_eq!(jumped.deck_remaining_counts(), live.deck_remaining_counts());
    assert_eq!(jumped.history(), live.history());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message_key, "game.jumped");
    assert_eq!(events[0].params["step_index"], 6);
}

#[test]
fn jump_to_every_prefix_matches() {
    let log = scripted_log();
    for k in 0..=log.len() {
        let prefix_live = step_live(42, &log[..k]);
        let (jumped, _) = jump(42, Mode::Practice, None, &log, k).expect("jump");
        assert_eq!(jumped.hand(), prefix_live.hand(), "prefix {k}");
        assert_eq!(jumped.score_total(), prefix_live.score_total(), "prefix {k}");
        assert_eq!(jumped.step_index(), k);
    }
}

#[test]
fn replay_full_log_equals_jump_to_end() {
    let log = scripted_log();
    let (jumped, _) = jump(42, Mode::Practice, None, &log, log.len()).expect("jump");
    let replayed = replay(42, Mode::Practice, None, &log).expect("replay");
    assert_eq!(replayed.hand(), jumped.hand());
    assert_eq!(replayed.history(), jumped.history());
    assert_eq!(replayed.score_total(), jumped.score_total());
}

#[test]
fn jump_truncates_future_history() {
    let log = scripted_log();
    let (state, _) = jump(42, Mode::Practice, None, &log, 2).expect("jump");
    assert_eq!(state.history(), &log[..2]);

    // Applying after the jump extends the truncated log; the old suffix is
    // gone, no branching timelines.
    let new_action = Action::discard(vec![6]);
    let (state, _) = apply_action(&state, &new_action).expect("legal action");
    assert_eq!(state.history().len(), 3);
    assert_eq!(state.history()[..2], log[..2]);
    assert_eq!(state.history()[2], new_action);
}

#[test]
fn jump_beyond_history_is_rejected() {
    let log = scripted_log();
    let err = jump(42, Mode::Practice, None, &log, 7).expect_err("out of range");
    assert_eq!(
        err,
        EngineError::JumpNotAllowed {
            requested: 7,
            history_len: 6
        }
    );
    assert_eq!(err.message_key(), "error.jump_not_allowed");
}

#[test]
fn jump_is_deterministic_across_invocations() {
    let log = scripted_log();
    let (a, _) = jump(0xFEED_u64, Mode::Practice, None, &log, 4).expect("jump");
    let (b, _) = jump(0xFEED_u64, Mode::Practice, None, &log, 4).expect("jump");
    assert_eq!(a.hand(), b.hand());
    assert_eq!(a.deck_remaining_counts(), b.deck_remaining_counts());
    assert_eq!(a.score_total(), b.score_total());
}
