use crate::cards::Card;
use crate::engine::apply::apply_action;
use crate::engine::classify::classify;
use crate::engine::score::model_points;
use crate::errors::EngineError;
use crate::policy::heuristic::ai_hint;
use crate::policy::trace::TraceStep;
use crate::state::{GameState, INITIAL_PLAYS};
use crate::types::Action;

/// Result of one blinded playout: the heuristic's own choices fed forward
/// against the real ordered draws, with the policy seeing public views
/// only.
#[derive(Debug, Clone)]
pub struct PlayoutOutcome {
    /// Terminal total under the model scoring table (jackpots collapsed),
    /// accumulated from the starting state onward.
    pub model_score: u64,
    /// Terminal `score_total` under gameplay scoring.
    pub gameplay_score: u64,
    pub plays_completed: u8,
    pub steps: Vec<TraceStep>,
    /// Set when the policy's chosen action failed engine validation — a
    /// trace-gate failure, recorded rather than raised.
    pub validation_error: Option<EngineError>,
}

impl PlayoutOutcome {
    /// The stage-C base gate: all plays executed, no validation errors.
    #[inline]
    pub fn completed(&self) -> bool {
        self.plays_completed == INITIAL_PLAYS && self.validation_error.is_none()
    }
}

/// Run the heuristic end-to-end from `state` to terminal. Decisions are a
/// pure function of the public projection; draws come from the hidden
/// ordered deck through the engine. Steps are recorded in trace-artifact
/// form.
pub fn blinded_playout(mut state: GameState) -> PlayoutOutcome {
    let mut model_score: u64 = 0;
    let mut plays_completed: u8 = 0;
    let mut steps = Vec::new();
    let mut validation_error = None;

    while !state.is_terminal() {
        let Some(hint) = ai_hint(&state.public_view()) else {
            break;
        };

        if let Action::Play { selected_indices } = &hint.action {
            let hand = state.hand();
            let cards: [Card; 5] = [
                hand[selected_indices[0]],
                hand[selected_indices[1]],
                hand[selected_indices[2]],
                hand[selected_indices[3]],
                hand[selected_indices[4]],
            ];
            model_score += u64::from(model_points(classify(&cards)));
        }

        match apply_action(&state, &hint.action) {
            Ok((next, _events)) => {
                if hint.action.is_play() {
                    plays_completed += 1;
                }
                steps.push(TraceStep::from_hint(steps.len(), &hint));
                state = next;
            }
            Err(err) => {
                validation_error = Some(err);
                break;
            }
        }
    }

    PlayoutOutcome {
        model_score,
        gameplay_score: state.score_total(),
        plays_completed,
        steps,
        validation_error,
    }
}
