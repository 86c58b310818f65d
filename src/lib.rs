#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited

pub mod cards;
pub mod errors;
pub mod events;
pub mod infoset;
pub mod manifest;
pub mod rng;
pub mod state;
pub mod types;

pub mod engine {
    pub mod apply;
    pub mod classify;
    pub mod replay;
    pub mod score;
}

pub mod policy;

pub mod calibrate;

// Re-exports: stable minimal API surface for external callers
pub use crate::cards::{standard_deck, Card, Rank, Suit};
pub use crate::engine::apply::{apply_action, validate_action};
pub use crate::engine::classify::{classify, HandCategory};
pub use crate::engine::replay::{jump, replay};
pub use crate::engine::score::{
    gameplay_points, model_points, normalize_model_category, score_play_gameplay,
};
pub use crate::errors::{EngineError, ErrorCategory};
pub use crate::events::Event;
pub use crate::infoset::{declare_context, ContextTag, PrivilegedContext};
pub use crate::manifest::{load_manifest, save_manifest, SeedManifest, TierPool};
pub use crate::policy::{ai_hint, ai_trace, validate_trace_artifact, Hint, TraceArtifact};
pub use crate::rng::{shuffled_deck, PRNG_ID};
pub use crate::state::{start_from_manifest, GameState, PublicView};
pub use crate::types::{Action, Mode, Tier};
