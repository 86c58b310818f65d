use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cards::Card;
use crate::errors::EngineError;
use crate::infoset::INFO_SET_ORDER_UNKNOWN;
use crate::state::{GameState, PublicView};
use crate::types::{Action, Mode};

use super::heuristic::{ai_hint, Hint};

/// Identifier of the decision policy that produced a trace.
pub const POLICY_ID: &str = "heuristic-v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_index: usize,
    pub recommended_action: Action,
    pub explanation_key: String,
    pub params: Value,
}

impl TraceStep {
    pub fn from_hint(step_index: usize, hint: &Hint) -> TraceStep {
        TraceStep {
            step_index,
            recommended_action: hint.action.clone(),
            explanation_key: hint.explanation_key.clone(),
            params: hint.params.clone(),
        }
    }
}

/// A recorded sequence of policy decisions under the order-unknown
/// information set. The tag is load-bearing: the runtime trace server
/// rejects artifacts that do not carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceArtifact {
    pub seed: u64,
    pub policy: String,
    pub info_set: String,
    pub steps: Vec<TraceStep>,
}

impl TraceArtifact {
    pub fn new(seed: u64, steps: Vec<TraceStep>) -> TraceArtifact {
        TraceArtifact {
            seed,
            policy: POLICY_ID.to_string(),
            info_set: INFO_SET_ORDER_UNKNOWN.to_string(),
            steps,
        }
    }
}

/// Gate for artifacts entering the runtime trace server.
pub fn validate_trace_artifact(artifact: &TraceArtifact) -> Result<(), EngineError> {
    if artifact.info_set == INFO_SET_ORDER_UNKNOWN {
        Ok(())
    } else {
        Err(EngineError::TraceArtifactMissingInfoSetTag)
    }
}

/// Hypothetical order-unknown game used by the runtime trace: the policy's
/// chosen action is fed forward, and every draw yields the representative
/// (canonical-median) card of the remaining multiset. A projection, not a
/// prediction.
struct Projection {
    hand: Vec<Card>,
    counts: BTreeMap<Card, u8>,
    remaining: usize,
    p_remaining: u8,
    d_remaining: u8,
    score_total: u64,
}

impl Projection {
    fn from_view(view: PublicView) -> Projection {
        Projection {
            hand: view.hand,
            counts: view.deck_remaining_counts,
            remaining: view.deck_remaining_count,
            p_remaining: view.p_remaining,
            d_remaining: view.d_remaining,
            score_total: view.score_total,
        }
    }

    fn view(&self) -> PublicView {
        PublicView {
            hand: self.hand.clone(),
            p_remaining: self.p_remaining,
            d_remaining: self.d_remaining,
            score_total: self.score_total,
            deck_remaining_count: self.remaining,
            deck_remaining_counts: self.counts.clone(),
        }
    }

    /// The canonical-order median of the remaining multiset: a deterministic
    /// rank-neutral stand-in for an unknown draw.
    fn representative_draw(&mut self) -> Option<Card> {
        let keys: Vec<Card> = self.counts.keys().copied().collect();
        let card = *keys.get(keys.len() / 2)?;
        match self.counts.get_mut(&card) {
            Some(n) if *n > 1 => *n -= 1,
            _ => {
                self.counts.remove(&card);
            }
        }
        self.remaining -= 1;
        Some(card)
    }

    fn apply(&mut self, action: &Action) {
        let indices = action.selected_indices();
        let mut kept: Vec<Card> = Vec::with_capacity(self.hand.len());
        for (i, card) in self.hand.iter().enumerate() {
            if !indices.contains(&i) {
                kept.push(*card);
            }
        }
        let draw_n = indices.len().min(self.remaining);
        self.hand = kept;
        for _ in 0..draw_n {
            if let Some(card) = self.representative_draw() {
                self.hand.push(card);
            }
        }
        match action {
            Action::Play { .. } => self.p_remaining -= 1,
            Action::Discard { .. } => self.d_remaining -= indices.len() as u8,
        }
    }
}

/// Produce the runtime trace for a seed: repeated `ai_hint` decisions over
/// the hypothetical projection, to terminal. Used for UI reveal; the
/// calibration gate builds its artifact against realized draws instead.
pub fn ai_trace(seed: u64, mode: Mode, target_score: Option<u64>) -> TraceArtifact {
    let (state, _) = GameState::from_seed(seed, mode, target_score);
    let mut projection = Projection::from_view(state.public_view());
    let mut steps = Vec::new();

    while projection.p_remaining > 0 {
        let Some(hint) = ai_hint(&projection.view()) else {
            break;
        };
        steps.push(TraceStep::from_hint(steps.len(), &hint));
        projection.apply(&hint.action);
    }

    TraceArtifact::new(seed, steps)
}
