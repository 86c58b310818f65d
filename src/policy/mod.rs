pub mod candidates;
pub mod heuristic;
pub mod trace;

pub use candidates::{discard_templates, enumerate_discards_full, play_candidates};
pub use heuristic::{ai_hint, rank_candidates, retention_order, Hint, ScoredCandidate};
pub use trace::{ai_trace, validate_trace_artifact, TraceArtifact, TraceStep, POLICY_ID};
