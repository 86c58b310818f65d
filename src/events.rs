use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cards::Card;
use crate::engine::classify::HandCategory;
use crate::errors::EngineError;

/// Explanation key attached to every heuristic hint/trace decision.
pub const AI_REASON_HEURISTIC: &str = "ai.reason.heuristic";

/// A structured engine event. Events are data, not prose; UI strings are
/// never produced by the core. `type` is the leading segment of the
/// message key (`game`, `play`, `discard`, `error`, `ai`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub message_key: String,
    pub params: Value,
}

impl Event {
    fn new(message_key: &str, params: Value) -> Event {
        let kind = message_key.split('.').next().unwrap_or(message_key);
        Event {
            kind: kind.to_string(),
            message_key: message_key.to_string(),
            params,
        }
    }

    pub fn game_started(seed: u64) -> Event {
        Event::new("game.started", json!({ "seed": seed }))
    }

    pub fn game_ended(score_total: u64) -> Event {
        Event::new("game.ended", json!({ "score_total": score_total }))
    }

    pub fn game_passed(score_total: u64, target_score: u64) -> Event {
        Event::new(
            "game.passed",
            json!({ "score_total": score_total, "target_score": target_score }),
        )
    }

    pub fn game_failed(score_total: u64, target_score: u64) -> Event {
        Event::new(
            "game.failed",
            json!({ "score_total": score_total, "target_score": target_score }),
        )
    }

    pub fn game_jumped(step_index: usize) -> Event {
        Event::new("game.jumped", json!({ "step_index": step_index }))
    }

    pub fn play_scored(
        category: HandCategory,
        points: u32,
        played: &[Card],
        drawn: &[Card],
        p_remaining_after: u8,
        score_total_after: u64,
    ) -> Event {
        Event::new(
            "play.scored",
            json!({
                "category": category,
                "points": points,
                "played": played,
                "drawn": drawn,
                "p_remaining_after": p_remaining_after,
                "score_total_after": score_total_after,
            }),
        )
    }

    pub fn discard_performed(
        discarded: &[Card],
        drawn: &[Card],
        d_remaining_after: u8,
    ) -> Event {
        Event::new(
            "discard.performed",
            json!({
                "count": discarded.len(),
                "discarded": discarded,
                "drawn": drawn,
                "d_remaining_after": d_remaining_after,
            }),
        )
    }

    /// Error surfaced as an event at the response boundary.
    pub fn from_error(err: &EngineError) -> Event {
        Event::new(err.message_key(), err.params())
    }
}
