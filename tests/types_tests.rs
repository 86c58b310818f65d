use sevendraw::types::{BudgetedPolicy, PolicyKind};
use sevendraw::{Action, EngineError, Mode, Tier};

#[test]
fn action_wire_shape() {
    let action = Action::play(vec![0, 2, 4, 5, 6]);
    let json = serde_json::to_string(&action).expect("serialize");
    assert_eq!(json, r#"{"type":"PLAY","selected_indices":[0,2,4,5,6]}"#);

    let back: Action =
        serde_json::from_str(r#"{"type":"DISCARD","selected_indices":[1,3]}"#).expect("parse");
    assert_eq!(back, Action::discard(vec![1, 3]));
}

#[test]
fn malformed_actions_are_contract_violations() {
    for bad in [
        r#"{"type":"FOLD","selected_indices":[0]}"#,
        r#"{"type":"PLAY"}"#,
        r#"{"selected_indices":[0,1,2,3,4]}"#,
        r#"{"type":"PLAY","selected_indices":"0"}"#,
        "[]",
    ] {
        let err = Action::from_json(bad).expect_err("must reject");
        assert_eq!(err, EngineError::InvalidActionShape);
        assert_eq!(err.message_key(), "error.invalid_action_shape");
    }
}

#[test]
fn mode_and_tier_parse_their_wire_names() {
    assert_eq!("practice".parse::<Mode>().expect("mode"), Mode::Practice);
    assert_eq!("challenge".parse::<Mode>().expect("mode"), Mode::Challenge);
    let err = "tournament".parse::<Mode>().expect_err("unknown");
    assert_eq!(err.message_key(), "error.unknown_mode");

    assert_eq!("hard".parse::<Tier>().expect("tier"), Tier::Hard);
    let err = "nightmare".parse::<Tier>().expect_err("unknown");
    assert_eq!(
        err,
        EngineError::UnknownDifficultyTier {
            tier: "nightmare".to_string()
        }
    );

    for mode in Mode::ALL {
        assert_eq!(mode.as_str().parse::<Mode>().expect("round trip"), mode);
    }
    for tier in Tier::ALL {
        assert_eq!(tier.as_str().parse::<Tier>().expect("round trip"), tier);
    }
}

#[test]
fn limited_policy_budget_is_consumed_and_never_refunded() {
    let mut policy = BudgetedPolicy::limited(2);
    assert_eq!(policy.kind, PolicyKind::Limited);
    assert!(policy.try_consume());
    assert!(policy.try_consume());
    assert!(!policy.try_consume(), "budget exhausted");
    assert_eq!(policy.budget_remaining, Some(0));
    assert_eq!(policy.budget_total, Some(2));

    assert!(BudgetedPolicy::unlimited().try_consume());
    assert!(!BudgetedPolicy::off().try_consume());
}
