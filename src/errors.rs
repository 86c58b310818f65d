use serde_json::{json, Value};
use thiserror::Error;

/// How an error should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client-recoverable: state is untouched, retry with a corrected action.
    Validation,
    /// Client-recoverable via jump or reset.
    SessionState,
    /// Fatal to the request, non-mutating.
    Contract,
    /// Fatal to the process: a code or deployment bug, never an ordinary
    /// game error.
    InfoSet,
}

/// Engine error taxonomy. Errors are values returned as `Result`, never
/// control-flow exceptions; a failed operation mutates nothing. Every
/// variant maps to a stable `message_key` plus structured `params`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("game already ended")]
    GameAlreadyEnded,

    #[error("PLAY requires exactly five indices (got {got})")]
    PlayRequiresFive { got: usize },

    #[error("DISCARD of {got} cards outside 1..={max}")]
    DiscardSizeInvalid { got: usize, max: usize },

    #[error("discard budget exceeded: requested {requested}, {d_remaining} left")]
    DiscardBudgetExceeded { requested: usize, d_remaining: u8 },

    #[error("index {index} out of range for hand of {hand_len}")]
    IndicesOutOfRange { index: usize, hand_len: usize },

    #[error("duplicate selected index {index}")]
    IndicesNotUnique { index: usize },

    #[error("jump to step {requested} not allowed (history has {history_len})")]
    JumpNotAllowed { requested: usize, history_len: usize },

    #[error("jump budget exhausted")]
    JumpBudgetExhausted,

    #[error("hint budget exhausted")]
    HintBudgetExhausted,

    #[error("malformed action payload")]
    InvalidActionShape,

    #[error("unknown mode `{mode}`")]
    UnknownMode { mode: String },

    #[error("unknown difficulty tier `{tier}`")]
    UnknownDifficultyTier { tier: String },

    #[error("seed manifest has no pool for {mode}/{tier}")]
    SeedManifestMissing { mode: String, tier: String },

    #[error("calibration component constructed in a runtime process")]
    CalibrationComponentInRuntime,

    #[error("trace artifact missing order-unknown info-set tag")]
    TraceArtifactMissingInfoSetTag,
}

impl EngineError {
    /// Stable message key for the event/response boundary.
    pub fn message_key(&self) -> &'static str {
        match self {
            EngineError::GameAlreadyEnded => "error.game_already_ended",
            EngineError::PlayRequiresFive { .. } => "error.play_requires_five",
            EngineError::DiscardSizeInvalid { .. } => "error.discard_size_invalid",
            EngineError::DiscardBudgetExceeded { .. } => "error.discard_budget_exceeded",
            EngineError::IndicesOutOfRange { .. } => "error.indices_out_of_range",
            EngineError::IndicesNotUnique { .. } => "error.indices_not_unique",
            EngineError::JumpNotAllowed { .. } => "error.jump_not_allowed",
            EngineError::JumpBudgetExhausted => "error.jump_budget_exhausted",
            EngineError::HintBudgetExhausted => "error.hint_budget_exhausted",
            EngineError::InvalidActionShape => "error.invalid_action_shape",
            EngineError::UnknownMode { .. } => "error.unknown_mode",
            EngineError::UnknownDifficultyTier { .. } => "error.unknown_difficulty_tier",
            EngineError::SeedManifestMissing { .. } => "error.seed_manifest_missing",
            EngineError::CalibrationComponentInRuntime => "error.calibration_component_in_runtime",
            EngineError::TraceArtifactMissingInfoSetTag => {
                "error.trace_artifact_missing_info_set_tag"
            }
        }
    }

    /// Structured parameters for the event/response boundary.
    pub fn params(&self) -> Value {
        match self {
            EngineError::PlayRequiresFive { got } => json!({ "got": got }),
            EngineError::DiscardSizeInvalid { got, max } => json!({ "got": got, "max": max }),
            EngineError::DiscardBudgetExceeded {
                requested,
                d_remaining,
            } => json!({ "requested": requested, "d_remaining": d_remaining }),
            EngineError::IndicesOutOfRange { index, hand_len } => {
                json!({ "index": index, "hand_len": hand_len })
            }
            EngineError::IndicesNotUnique { index } => json!({ "index": index }),
            EngineError::JumpNotAllowed {
                requested,
                history_len,
            } => json!({ "requested": requested, "history_len": history_len }),
            EngineError::UnknownMode { mode } => json!({ "mode": mode }),
            EngineError::UnknownDifficultyTier { tier } => json!({ "tier": tier }),
            EngineError::SeedManifestMissing { mode, tier } => {
                json!({ "mode": mode, "tier": tier })
            }
            _ => json!({}),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::PlayRequiresFive { .. }
            | EngineError::DiscardSizeInvalid { .. }
            | EngineError::DiscardBudgetExceeded { .. }
            | EngineError::IndicesOutOfRange { .. }
            | EngineError::IndicesNotUnique { .. } => ErrorCategory::Validation,
            EngineError::GameAlreadyEnded
            | EngineError::JumpNotAllowed { .. }
            | EngineError::JumpBudgetExhausted
            | EngineError::HintBudgetExhausted => ErrorCategory::SessionState,
            EngineError::InvalidActionShape
            | EngineError::UnknownMode { .. }
            | EngineError::UnknownDifficultyTier { .. }
            | EngineError::SeedManifestMissing { .. } => ErrorCategory::Contract,
            EngineError::CalibrationComponentInRuntime
            | EngineError::TraceArtifactMissingInfoSetTag => ErrorCategory::InfoSet,
        }
    }
}
