use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::policy::TraceArtifact;
use crate::types::Tier;

use super::SeedSource;

/// Buffer size for JSONL artifact sinks.
pub const BUF_WRITER_CAP_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct JsonlStats {
    pub lines: u64,
    pub sha256_hex: String,
}

/// JSONL artifact writer with a running SHA-256 over the emitted bytes.
/// Single-flush policy: flush once at finish; the digest lands in
/// `summary.json` so a re-run can be compared byte-for-byte.
pub struct JsonlWriter {
    out: BufWriter<File>,
    hasher: Sha256,
    lines: u64,
}

impl JsonlWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<JsonlWriter, String> {
        let file = File::create(path.as_ref())
            .map_err(|e| format!("create {} error: {e}", path.as_ref().display()))?;
        Ok(JsonlWriter {
            out: BufWriter::with_capacity(BUF_WRITER_CAP_BYTES, file),
            hasher: Sha256::new(),
            lines: 0,
        })
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<(), String> {
        let line =
            serde_json::to_vec(record).map_err(|e| format!("jsonl serialize error: {e}"))?;
        self.out
            .write_all(&line)
            .and_then(|()| self.out.write_all(b"\n"))
            .map_err(|e| format!("jsonl write error: {e}"))?;
        self.hasher.update(&line);
        self.hasher.update(b"\n");
        self.lines += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<JsonlStats, String> {
        self.out
            .flush()
            .map_err(|e| format!("jsonl flush error: {e}"))?;
        Ok(JsonlStats {
            lines: self.lines,
            sha256_hex: hex::encode(self.hasher.finalize()),
        })
    }
}

/// One line of `calibration_results.jsonl`. Stage-B fields are present only
/// for seeds that went through EV refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub seed: u64,
    pub tier: Tier,
    pub stage_a_score: u64,
    pub stage_a_gameplay_score: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stage_b_ev_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stage_b_ev_std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stage_b_success_rate: Option<f64>,
}

/// One line of `trace_pass.jsonl`: the order-unknown artifact plus the
/// realized scores of its ordered-deck path. `meets_target` is the
/// challenge feasibility verdict; practice pools ignore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracePassRecord {
    pub seed: u64,
    pub tier: Tier,
    pub realized_model_score: u64,
    pub realized_gameplay_score: u64,
    pub meets_target: bool,
    pub artifact: TraceArtifact,
}

/// One line of `trace_fail.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFailRecord {
    pub seed: u64,
    pub tier: Tier,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSummary {
    pub tier: Tier,
    pub seed_count: usize,
    pub target_score: u64,
    pub trace_pass: usize,
    pub trace_fail: usize,
    pub challenge_pool: usize,
}

/// Run metadata. Intentionally carries no timestamp: a re-run with the same
/// configuration must produce byte-identical artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub engine_version: String,
    pub prng: String,
    pub policy: String,
    pub run_id: String,
    pub seed_source: SeedSource,
    pub seeds_evaluated: usize,
    pub top_k: usize,
    pub rollouts: usize,
    pub boundary_band: f64,
    pub stage_b_evaluated: usize,
    pub cutoff_policy: String,
    /// Combined-score cutoffs, ascending; below the first is `hard`, below
    /// the second is `medium`, the rest is `easy`.
    pub cutoffs: Vec<f64>,
    pub target_quantile: f64,
    pub tiers: Vec<TierSummary>,
    pub digests: BTreeMap<String, String>,
}
