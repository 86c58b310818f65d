use std::cmp::Ordering;

use crate::cards::Card;
use crate::engine::apply::apply_action;
use crate::engine::classify::classify;
use crate::engine::score::model_points;
use crate::errors::EngineError;
use crate::infoset::PrivilegedContext;
use crate::policy::heuristic::{action_shape_order, rank_candidates};
use crate::rng::rollout_rng;
use crate::state::GameState;
use crate::types::Action;

use super::stages::blinded_playout;

#[derive(Debug, Clone, Copy)]
pub struct RolloutConfig {
    /// Candidates taken from the top of the heuristic ranking.
    pub top_k: usize,
    /// Rollouts per candidate.
    pub rollouts: usize,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        RolloutConfig {
            top_k: 10,
            rollouts: 128,
        }
    }
}

/// EV estimate for one candidate action at a decision point.
#[derive(Debug, Clone)]
pub struct CandidateEv {
    pub action: Action,
    pub ev_mean: f64,
    pub ev_std: f64,
    /// Terminal model totals, one per rollout, accumulated from the
    /// decision point onward (candidate included).
    pub terminals_model: Vec<u64>,
    /// Terminal gameplay `score_total`, one per rollout.
    pub terminals_gameplay: Vec<u64>,
}

/// Ordered-deck rollout evaluator. Calibration only: construction requires
/// a `PrivilegedContext`, which a runtime process cannot acquire.
///
/// Each rollout permutes the remaining deck with a stream derived from
/// (seed, candidate, rollout) and follows the order-unknown heuristic to
/// terminal, so the estimate is the candidate's value over draw orders
/// consistent with the public multiset — reproducible bit-for-bit.
pub struct RolloutEvaluator<'c> {
    ctx: &'c PrivilegedContext,
    cfg: RolloutConfig,
}

impl<'c> RolloutEvaluator<'c> {
    pub fn new(ctx: &'c PrivilegedContext, cfg: RolloutConfig) -> RolloutEvaluator<'c> {
        RolloutEvaluator { ctx, cfg }
    }

    /// Evaluate the top-K candidates at `state`, best first: mean terminal
    /// model score, tie-broken by lower standard deviation, then by action
    /// shape.
    pub fn evaluate(
        &self,
        state: &GameState,
        seed: u64,
    ) -> Result<Vec<CandidateEv>, EngineError> {
        let ranked = rank_candidates(&state.public_view());
        let mut out: Vec<CandidateEv> = Vec::with_capacity(self.cfg.top_k.min(ranked.len()));

        for (ci, candidate) in ranked.iter().take(self.cfg.top_k).enumerate() {
            let immediate_model = match &candidate.action {
                Action::Play { selected_indices } => {
                    let hand = state.hand();
                    let cards: [Card; 5] = [
                        hand[selected_indices[0]],
                        hand[selected_indices[1]],
                        hand[selected_indices[2]],
                        hand[selected_indices[3]],
                        hand[selected_indices[4]],
                    ];
                    u64::from(model_points(classify(&cards)))
                }
                Action::Discard { .. } => 0,
            };

            let (applied, _events) = apply_action(state, &candidate.action)?;

            let mut terminals_model = Vec::with_capacity(self.cfg.rollouts);
            let mut terminals_gameplay = Vec::with_capacity(self.cfg.rollouts);
            for r in 0..self.cfg.rollouts {
                let mut rollout_state = applied.clone();
                let mut rng = rollout_rng(seed, ci as u64, r as u64);
                rollout_state.shuffle_remaining_deck(self.ctx, &mut rng);
                let outcome = blinded_playout(rollout_state);
                terminals_model.push(immediate_model + outcome.model_score);
                terminals_gameplay.push(outcome.gameplay_score);
            }

            let n = terminals_model.len() as f64;
            let mean = terminals_model.iter().map(|&v| v as f64).sum::<f64>() / n;
            let var = terminals_model
                .iter()
                .map(|&v| {
                    let d = v as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / n;

            out.push(CandidateEv {
                action: candidate.action.clone(),
                ev_mean: mean,
                ev_std: var.sqrt(),
                terminals_model,
                terminals_gameplay,
            });
        }

        out.sort_by(|a, b| {
            b.ev_mean
                .partial_cmp(&a.ev_mean)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.ev_std.partial_cmp(&b.ev_std).unwrap_or(Ordering::Equal))
                .then_with(|| action_shape_order(&a.action, &b.action))
        });
        Ok(out)
    }
}
