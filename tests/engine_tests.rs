use sevendraw::engine::apply::apply_action;
use sevendraw::{Action, Card, EngineError, GameState, Mode};

fn cards(rs: &[&str]) -> Vec<Card> {
    rs.iter().map(|c| c.parse().expect("valid RS card")).collect()
}

/// A crafted state: four 7s plus low clubs in hand, a known deck suffix.
fn four_sevens_state(mode: Mode, target: Option<u64>) -> GameState {
    GameState::with_setup(
        cards(&["7H", "7C", "7S", "7D", "2C", "3C", "4C"]),
        cards(&[
            "9S", "9H", "9D", "9C", "TS", "TH", "TD", "TC", "JS", "JH", "JD", "JC", "QS", "QH",
        ]),
        mode,
        target,
    )
    .expect("valid setup")
}

#[test]
fn start_deals_seven_and_sets_budgets() {
    let (state, events) = GameState::from_seed(123_456, Mode::Practice, None);
    assert_eq!(state.hand().len(), 7);
    assert_eq!(state.p_remaining(), 4);
    assert_eq!(state.d_remaining(), 10);
    assert_eq!(state.score_total(), 0);
    assert_eq!(state.deck_remaining_count(), 45);
    assert!(state.history().is_empty());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message_key, "game.started");
    assert_eq!(events[0].kind, "game");
    assert_eq!(events[0].params["seed"], 123_456);
}

#[test]
fn start_is_deterministic() {
    // Determinism scenario: first hand and counts map are identical on
    // every run.
    let (first, _) = GameState::from_seed(123_456, Mode::Practice, None);
    let first_counts =
        serde_json::to_string(&first.deck_remaining_counts()).expect("serialize counts");
    for _ in 0..1000 {
        let (state, _) = GameState::from_seed(123_456, Mode::Practice, None);
        assert_eq!(state.hand(), first.hand());
        let counts = serde_json::to_string(&state.deck_remaining_counts()).expect("serialize");
        assert_eq!(counts, first_counts);
    }
}

#[test]
fn play_four_of_a_kind_scores_730() {
    // Scoring-mapping scenario: the four 7s plus 2C.
    let state = four_sevens_state(Mode::Practice, None);
    let action = Action::play(vec![0, 1, 2, 3, 4]);
    let (next, events) = apply_action(&state, &action).expect("legal play");

    assert_eq!(events[0].message_key, "play.scored");
    assert_eq!(events[0].params["category"], "FOUR_OF_A_KIND");
    assert_eq!(events[0].params["points"], 730);
    assert_eq!(next.score_total(), 730);
    assert_eq!(next.p_remaining(), 3);
    // Removed 5, drew 5: hand restored to 7, survivors first.
    assert_eq!(next.hand().len(), 7);
    assert_eq!(next.hand()[0].to_string(), "3C");
    assert_eq!(next.hand()[1].to_string(), "4C");
    assert_eq!(next.hand()[2].to_string(), "9S");
    assert_eq!(next.deck_remaining_count(), state.deck_remaining_count() - 5);
    assert_eq!(next.history().len(), 1);
}

#[test]
fn discard_redraws_and_spends_budget() {
    let state = four_sevens_state(Mode::Practice, None);
    let action = Action::discard(vec![4, 5, 6]);
    let (next, events) = apply_action(&state, &action).expect("legal discard");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].message_key, "discard.performed");
    assert_eq!(events[0].params["count"], 3);
    assert_eq!(events[0].params["discarded"][0], "2C");
    assert_eq!(next.d_remaining(), 7);
    assert_eq!(next.p_remaining(), 4);
    assert_eq!(next.score_total(), 0);
    assert_eq!(next.hand().len(), 7);
    // Survivor order preserved, draws appended from the deck front.
    assert_eq!(next.hand()[0].to_string(), "7H");
    assert_eq!(next.hand()[4].to_string(), "9S");
    assert_eq!(next.hand()[5].to_string(), "9H");
    assert_eq!(next.hand()[6].to_string(), "9D");
}

#[test]
fn discard_budget_exhaustion_is_an_error_and_mutates_nothing() {
    // Discard-budget scenario: 6 then 4 spends the budget of 10; the third
    // discard of any size fails and leaves the state unchanged.
    let state = four_sevens_state(Mode::Practice, None);
    let (state, _) =
        apply_action(&state, &Action::discard(vec![0, 1, 2, 3, 4, 5])).expect("first discard");
    assert_eq!(state.d_remaining(), 4);
    let (state, _) =
        apply_action(&state, &Action::discard(vec![0, 1, 2, 3])).expect("second discard");
    assert_eq!(state.d_remaining(), 0);
    assert_eq!(state.hand().len(), 7);

    let before_hand = state.hand().to_vec();
    let before_counts = state.deck_remaining_counts();
    let err = apply_action(&state, &Action::discard(vec![0])).expect_err("budget exhausted");
    assert_eq!(
        err,
        EngineError::DiscardBudgetExceeded {
            requested: 1,
            d_remaining: 0
        }
    );
    assert_eq!(err.message_key(), "error.discard_budget_exceeded");
    assert_eq!(state.hand(), before_hand.as_slice());
    assert_eq!(state.deck_remaining_counts(), before_counts);
    assert_eq!(state.history().len(), 2);
}

#[test]
fn validation_error_taxonomy() {
    let state = four_sevens_state(Mode::Practice, None);

    let err = apply_action(&state, &Action::play(vec![0, 1, 2, 3])).expect_err("four indices");
    assert_eq!(err, EngineError::PlayRequiresFive { got: 4 });

    let err = apply_action(&state, &Action::play(vec![0, 1, 2, 3, 9])).expect_err("out of range");
    assert_eq!(
        err,
        EngineError::IndicesOutOfRange {
            index: 9,
            hand_len: 7
        }
    );

    let err = apply_action(&state, &Action::play(vec![0, 1, 2, 3, 3])).expect_err("duplicate");
    assert_eq!(err, EngineError::IndicesNotUnique { index: 3 });

    let err = apply_action(&state, &Action::discard(vec![])).expect_err("empty discard");
    assert_eq!(err, EngineError::DiscardSizeInvalid { got: 0, max: 7 });
}

#[test]
fn game_ends_after_fourth_play() {
    let (mut state, _) = GameState::from_seed(7, Mode::Practice, None);
    for play in 0..4 {
        let (next, events) =
            apply_action(&state, &Action::play(vec![0, 1, 2, 3, 4])).expect("legal play");
        state = next;
        if play < 3 {
            assert!(!state.is_terminal());
            assert!(events.iter().all(|e| e.message_key != "game.ended"));
        } else {
            assert!(state.is_terminal());
            assert!(events.iter().any(|e| e.message_key == "game.ended"));
            // Practice mode: no pass/fail verdict.
            assert!(events
                .iter()
                .all(|e| e.message_key != "game.passed" && e.message_key != "game.failed"));
        }
    }

    let err =
        apply_action(&state, &Action::play(vec![0, 1, 2, 3, 4])).expect_err("terminal state");
    assert_eq!(err, EngineError::GameAlreadyEnded);
    let err = apply_action(&state, &Action::discard(vec![0])).expect_err("terminal state");
    assert_eq!(err, EngineError::GameAlreadyEnded);
}

#[test]
fn challenge_verdict_at_exact_target_boundary() {
    // Pass/fail scenario: reaching the target exactly passes; one point
    // short fails.
    let final_score = {
        let (mut state, _) = GameState::from_seed(99, Mode::Practice, None);
        for _ in 0..4 {
            let (next, _) =
                apply_action(&state, &Action::play(vec![0, 1, 2, 3, 4])).expect("legal play");
            state = next;
        }
        state.score_total()
    };

    for (target, expected) in [(final_score, "game.passed"), (final_score + 1, "game.failed")] {
        let (mut state, _) = GameState::from_seed(99, Mode::Challenge, Some(target));
        let mut last_events = Vec::new();
        for _ in 0..4 {
            let (next, events) =
                apply_action(&state, &Action::play(vec![0, 1, 2, 3, 4])).expect("legal play");
            state = next;
            last_events = events;
        }
        assert!(
            last_events.iter().any(|e| e.message_key == expected),
            "target {target} expected {expected}, got {last_events:?}"
        );
    }
}

#[test]
fn card_mass_is_conserved() {
    let (mut state, _) = GameState::from_seed(31_337, Mode::Practice, None);
    let mut played = 0usize;
    let mut discarded = 0usize;
    let script = [
        Action::discard(vec![0, 6]),
        Action::play(vec![0, 1, 2, 3, 4]),
        Action::discard(vec![1, 2, 3]),
        Action::play(vec![2, 3, 4, 5, 6]),
        Action::play(vec![0, 2, 3, 4, 6]),
    ];
    for action in script {
        let (next, _) = apply_action(&state, &action).expect("legal action");
        match &action {
            Action::Play { .. } => played += 5,
            Action::Discard { selected_indices } => discarded += selected_indices.len(),
        }
        state = next;
        assert_eq!(
            state.hand().len() + state.deck_remaining_count() + played + discarded,
            52,
            "card mass conservation"
        );
    }
}

#[test]
fn counts_projection_is_canonical_and_round_trips() {
    use std::collections::BTreeMap;

    let state = GameState::with_setup(
        cards(&["5S", "5H", "5D", "5C", "6S", "6H", "6D"]),
        cards(&["AC", "2S", "7H", "KD"]),
        Mode::Practice,
        None,
    )
    .expect("valid setup");

    let json = serde_json::to_string(&state.public_view().deck_remaining_counts)
        .expect("serialize counts");
    // Canonical deck order regardless of hidden draw order: 2S < 7H < KD < AC.
    assert_eq!(json, r#"{"2S":1,"7H":1,"KD":1,"AC":1}"#);

    let multiset: BTreeMap<Card, u8> = serde_json::from_str(&json).expect("deserialize counts");
    let rejson = serde_json::to_string(&multiset).expect("reserialize");
    assert_eq!(json, rejson, "round trip must be byte-identical");
}

#[test]
fn public_view_exposes_no_draw_order() {
    let (state, _) = GameState::from_seed(2024, Mode::Practice, None);
    let view = state.public_view();
    let json = serde_json::to_value(&view).expect("serialize view");
    let obj = json.as_object().expect("object");
    let keys: Vec<&String> = obj.keys().collect();
    assert_eq!(
        keys,
        vec![
            "hand",
            "p_remaining",
            "d_remaining",
            "score_total",
            "deck_remaining_count",
            "deck_remaining_counts"
        ]
    );
    assert_eq!(view.deck_remaining_count, 45);
    assert_eq!(
        view.deck_remaining_counts.values().map(|&n| n as usize).sum::<usize>(),
        45
    );
}
