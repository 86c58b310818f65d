use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// A player action over positions in the current hand.
///
/// Wire shape: `{"type": "PLAY"|"DISCARD", "selected_indices": [int, ...]}`
/// with 0-based indices into the hand. Indices refer to positions, not card
/// identities; validation against hand size and budgets is the engine's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "PLAY")]
    Play { selected_indices: Vec<usize> },
    #[serde(rename = "DISCARD")]
    Discard { selected_indices: Vec<usize> },
}

impl Action {
    #[inline]
    pub fn play(indices: impl Into<Vec<usize>>) -> Action {
        Action::Play {
            selected_indices: indices.into(),
        }
    }

    #[inline]
    pub fn discard(indices: impl Into<Vec<usize>>) -> Action {
        Action::Discard {
            selected_indices: indices.into(),
        }
    }

    #[inline]
    pub fn selected_indices(&self) -> &[usize] {
        match self {
            Action::Play { selected_indices } | Action::Discard { selected_indices } => {
                selected_indices
            }
        }
    }

    #[inline]
    pub fn kind_str(&self) -> &'static str {
        match self {
            Action::Play { .. } => "PLAY",
            Action::Discard { .. } => "DISCARD",
        }
    }

    #[inline]
    pub fn is_play(&self) -> bool {
        matches!(self, Action::Play { .. })
    }

    /// Parse the wire shape. Anything that does not deserialize into a
    /// known action is the `invalid_action_shape` contract violation.
    pub fn from_json(json: &str) -> Result<Action, EngineError> {
        serde_json::from_str(json).map_err(|_| EngineError::InvalidActionShape)
    }
}

/// Game mode. Practice has no target score; challenge compares the final
/// `score_total` against the tier target from the seed manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Practice,
    Challenge,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Practice, Mode::Challenge];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Practice => "practice",
            Mode::Challenge => "challenge",
        }
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Mode, EngineError> {
        match s {
            "practice" => Ok(Mode::Practice),
            "challenge" => Ok(Mode::Challenge),
            other => Err(EngineError::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Difficulty tier assigned to a seed by offline calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

impl FromStr for Tier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Tier, EngineError> {
        match s {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            other => Err(EngineError::UnknownDifficultyTier {
                tier: other.to_string(),
            }),
        }
    }
}

/// Availability of a session-level feature (hints, jumps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Off,
    Unlimited,
    Limited,
}

/// A session-level feature policy with optional budget bookkeeping.
///
/// Budgets live on the session, outside the replayable path: jumping never
/// refunds them. The adapter persists this alongside `(seed, history)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetedPolicy {
    pub kind: PolicyKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub budget_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub budget_remaining: Option<u32>,
}

impl BudgetedPolicy {
    #[inline]
    pub fn off() -> Self {
        Self {
            kind: PolicyKind::Off,
            budget_total: None,
            budget_remaining: None,
        }
    }

    #[inline]
    pub fn unlimited() -> Self {
        Self {
            kind: PolicyKind::Unlimited,
            budget_total: None,
            budget_remaining: None,
        }
    }

    #[inline]
    pub fn limited(total: u32) -> Self {
        Self {
            kind: PolicyKind::Limited,
            budget_total: Some(total),
            budget_remaining: Some(total),
        }
    }

    /// Try to spend one unit of the budget. Returns false when the feature
    /// is off or the budget is exhausted; the caller picks the error.
    pub fn try_consume(&mut self) -> bool {
        match self.kind {
            PolicyKind::Off => false,
            PolicyKind::Unlimited => true,
            PolicyKind::Limited => match self.budget_remaining {
                Some(n) if n > 0 => {
                    self.budget_remaining = Some(n - 1);
                    true
                }
                _ => false,
            },
        }
    }
}
