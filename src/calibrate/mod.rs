use std::collections::BTreeMap;
use std::fs;
use std::hash::BuildHasherDefault;
use std::path::PathBuf;

use hashbrown::HashMap as HbHashMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub mod artifacts;
pub mod rollout;
pub mod stages;

use crate::infoset::PrivilegedContext;
use crate::manifest::{save_manifest, SeedManifest, TierPool};
use crate::policy::{TraceArtifact, POLICY_ID};
use crate::rng::PRNG_ID;
use crate::state::GameState;
use crate::types::{Mode, Tier};

use artifacts::{
    CalibrationRecord, JsonlWriter, Summary, TierSummary, TraceFailRecord, TracePassRecord,
};
use rollout::{RolloutConfig, RolloutEvaluator};
use stages::{blinded_playout, PlayoutOutcome};

type FastHasher = BuildHasherDefault<ahash::AHasher>;
type FastMap<K, V> = HbHashMap<K, V, FastHasher>;

/// Where the candidate seeds come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedSource {
    Range { start: u64, count: u64 },
    List { seeds: Vec<u64> },
}

impl SeedSource {
    fn resolve(&self) -> Vec<u64> {
        match self {
            SeedSource::Range { start, count } => (0..*count).map(|i| start + i).collect(),
            SeedSource::List { seeds } => seeds.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibrationConfig {
    pub run_id: String,
    /// Run artifacts land in `<out_root>/<run_id>/`.
    pub out_root: PathBuf,
    pub seeds: SeedSource,
    pub top_k: usize,
    pub rollouts: usize,
    /// Fraction of the combined-score span around each cutoff whose seeds
    /// get stage-B refinement.
    pub boundary_band: f64,
    /// Quantile of a tier's combined scores that becomes its challenge
    /// target.
    pub target_quantile: f64,
    /// Progress bars; off for tests.
    pub progress: bool,
}

impl CalibrationConfig {
    pub fn new(run_id: impl Into<String>, out_root: impl Into<PathBuf>, seeds: SeedSource) -> Self {
        CalibrationConfig {
            run_id: run_id.into(),
            out_root: out_root.into(),
            seeds,
            top_k: 10,
            rollouts: 128,
            boundary_band: 0.1,
            target_quantile: 0.35,
            progress: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalibrationReport {
    pub run_dir: PathBuf,
    pub summary: Summary,
}

struct StageA {
    seed: u64,
    score: u64,
    gameplay: u64,
}

struct StageB {
    seed: u64,
    ev_mean: f64,
    ev_std: f64,
    success_rate: f64,
}

struct StageC {
    seed: u64,
    outcome: PlayoutOutcome,
    artifact: TraceArtifact,
}

/// Linear-interpolation quantile of an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Equal-frequency tier cutoffs (thirds) over combined scores.
fn tier_cutoffs(scores: &[f64]) -> (f64, f64) {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    (
        quantile(&sorted, 1.0 / 3.0),
        quantile(&sorted, 2.0 / 3.0),
    )
}

/// Low combined score means the heuristic found little; that seed is hard.
#[inline]
fn tier_for(score: f64, c1: f64, c2: f64) -> Tier {
    if score < c1 {
        Tier::Hard
    } else if score < c2 {
        Tier::Medium
    } else {
        Tier::Easy
    }
}

/// Per-tier challenge target: the configured quantile of the tier's
/// combined scores, floored to a multiple of 10. Tiers with no seeds fall
/// back to the global quantile.
fn tier_targets(
    combined: &[(u64, f64, Tier)],
    target_quantile: f64,
) -> BTreeMap<Tier, u64> {
    let mut all: Vec<f64> = combined.iter().map(|(_, s, _)| *s).collect();
    all.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let global = quantile(&all, target_quantile);

    let mut targets = BTreeMap::new();
    for tier in Tier::ALL {
        let mut scores: Vec<f64> = combined
            .iter()
            .filter(|(_, _, t)| *t == tier)
            .map(|(_, s, _)| *s)
            .collect();
        let q = if scores.is_empty() {
            global
        } else {
            scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            quantile(&scores, target_quantile)
        };
        let target = ((q.max(0.0) as u64) / 10) * 10;
        targets.insert(tier, target);
    }
    targets
}

fn stage_bar(enabled: bool, len: u64, label: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(&format!(
            "[{{elapsed_precise}}] {label} {{bar:40.cyan/blue}} {{pos}}/{{len}}"
        ))
        .unwrap()
        .progress_chars("=>-"),
    );
    pb
}

/// Run the three-stage calibration pipeline and emit the run artifacts.
///
/// Stages are sequential per seed; the pipeline is parallel over seeds.
/// Every artifact is byte-deterministic for a given configuration: records
/// are sorted by seed, no timestamps are written, and stage-B rollout
/// streams are derived deterministically.
pub fn run_pipeline(
    ctx: &PrivilegedContext,
    cfg: &CalibrationConfig,
) -> Result<CalibrationReport, String> {
    let seeds = cfg.seeds.resolve();
    if seeds.is_empty() {
        return Err("no seeds to calibrate".to_string());
    }
    let run_dir = cfg.out_root.join(&cfg.run_id);
    fs::create_dir_all(&run_dir)
        .map_err(|e| format!("create run dir {} error: {e}", run_dir.display()))?;

    println!(
        "[calibrate] run '{}': {} seeds, K={}, R={}, band={}",
        cfg.run_id,
        seeds.len(),
        cfg.top_k,
        cfg.rollouts,
        cfg.boundary_band
    );

    // Stage A: baseline heuristic bucketing.
    let pb = stage_bar(cfg.progress, seeds.len() as u64, "stage-a");
    let mut stage_a: Vec<StageA> = seeds
        .par_iter()
        .map(|&seed| {
            let (state, _) = GameState::from_seed(seed, Mode::Practice, None);
            let outcome = blinded_playout(state);
            pb.inc(1);
            StageA {
                seed,
                score: outcome.model_score,
                gameplay: outcome.gameplay_score,
            }
        })
        .collect();
    pb.finish_and_clear();
    stage_a.sort_by_key(|r| r.seed);

    let a_scores: Vec<f64> = stage_a.iter().map(|r| r.score as f64).collect();
    let (prov_c1, prov_c2) = tier_cutoffs(&a_scores);
    let span = a_scores.iter().fold(f64::MIN, |m, &s| m.max(s))
        - a_scores.iter().fold(f64::MAX, |m, &s| m.min(s));
    let band = cfg.boundary_band * span.max(1.0);

    let prov_combined: Vec<(u64, f64, Tier)> = stage_a
        .iter()
        .map(|r| {
            let s = r.score as f64;
            (r.seed, s, tier_for(s, prov_c1, prov_c2))
        })
        .collect();
    let prov_targets = tier_targets(&prov_combined, cfg.target_quantile);

    // Stage B: EV refinement for seeds near the provisional cutoffs.
    let boundary: Vec<(u64, Tier)> = prov_combined
        .iter()
        .filter(|(_, s, _)| (s - prov_c1).abs() <= band || (s - prov_c2).abs() <= band)
        .map(|(seed, _, tier)| (*seed, *tier))
        .collect();

    println!(
        "[calibrate] stage-b: {} boundary seeds of {}",
        boundary.len(),
        seeds.len()
    );

    let evaluator = RolloutEvaluator::new(
        ctx,
        RolloutConfig {
            top_k: cfg.top_k,
            rollouts: cfg.rollouts,
        },
    );
    let pb = stage_bar(cfg.progress, boundary.len() as u64, "stage-b");
    let stage_b: Vec<StageB> = boundary
        .par_iter()
        .map(|&(seed, prov_tier)| -> Result<StageB, String> {
            let (state, _) = GameState::from_seed(seed, Mode::Practice, None);
            let evs = evaluator
                .evaluate(&state, seed)
                .map_err(|e| format!("stage-b rollout error for seed {seed}: {e}"))?;
            let best = evs
                .first()
                .ok_or_else(|| format!("stage-b produced no candidates for seed {seed}"))?;
            let target = prov_targets[&prov_tier];
            let hits = best
                .terminals_gameplay
                .iter()
                .filter(|&&g| g >= target)
                .count();
            pb.inc(1);
            Ok(StageB {
                seed,
                ev_mean: best.ev_mean,
                ev_std: best.ev_std,
                success_rate: hits as f64 / best.terminals_gameplay.len() as f64,
            })
        })
        .collect::<Result<Vec<StageB>, String>>()?;
    pb.finish_and_clear();

    let mut b_map: FastMap<u64, &StageB> = FastMap::default();
    for b in &stage_b {
        b_map.insert(b.seed, b);
    }

    // Final bucketing over combined scores.
    let combined_scores: Vec<f64> = stage_a
        .iter()
        .map(|r| b_map.get(&r.seed).map_or(r.score as f64, |b| b.ev_mean))
        .collect();
    let (c1, c2) = tier_cutoffs(&combined_scores);
    let combined: Vec<(u64, f64, Tier)> = stage_a
        .iter()
        .zip(combined_scores.iter())
        .map(|(r, &s)| (r.seed, s, tier_for(s, c1, c2)))
        .collect();
    let targets = tier_targets(&combined, cfg.target_quantile);
    let mut tier_map: FastMap<u64, Tier> = FastMap::default();
    for (seed, _, tier) in &combined {
        tier_map.insert(*seed, *tier);
    }

    // Stage C: order-unknown trace gate against the realized deck.
    let pb = stage_bar(cfg.progress, seeds.len() as u64, "stage-c");
    let mut stage_c: Vec<StageC> = seeds
        .par_iter()
        .map(|&seed| {
            let (state, _) = GameState::from_seed(seed, Mode::Practice, None);
            let outcome = blinded_playout(state);
            let artifact = TraceArtifact::new(seed, outcome.steps.clone());
            pb.inc(1);
            StageC {
                seed,
                outcome,
                artifact,
            }
        })
        .collect();
    pb.finish_and_clear();
    stage_c.sort_by_key(|r| r.seed);

    // Artifact emission, sorted by seed for byte-determinism.
    let mut results_writer = JsonlWriter::create(run_dir.join("calibration_results.jsonl"))?;
    for r in &stage_a {
        let b = b_map.get(&r.seed);
        results_writer.write_record(&CalibrationRecord {
            seed: r.seed,
            tier: tier_map[&r.seed],
            stage_a_score: r.score,
            stage_a_gameplay_score: r.gameplay,
            stage_b_ev_mean: b.map(|b| b.ev_mean),
            stage_b_ev_std: b.map(|b| b.ev_std),
            stage_b_success_rate: b.map(|b| b.success_rate),
        })?;
    }
    let results_stats = results_writer.finish()?;

    let mut pass_writer = JsonlWriter::create(run_dir.join("trace_pass.jsonl"))?;
    let mut fail_writer = JsonlWriter::create(run_dir.join("trace_fail.jsonl"))?;
    let mut pass_counts: BTreeMap<Tier, usize> = BTreeMap::new();
    let mut fail_counts: BTreeMap<Tier, usize> = BTreeMap::new();
    let mut practice_pools: BTreeMap<Tier, Vec<u64>> = BTreeMap::new();
    let mut challenge_pools: BTreeMap<Tier, Vec<u64>> = BTreeMap::new();

    for c in &stage_c {
        let tier = tier_map[&c.seed];
        if c.outcome.completed() {
            let target = targets[&tier];
            let meets_target = c.outcome.gameplay_score >= target;
            pass_writer.write_record(&TracePassRecord {
                seed: c.seed,
                tier,
                realized_model_score: c.outcome.model_score,
                realized_gameplay_score: c.outcome.gameplay_score,
                meets_target,
                artifact: c.artifact.clone(),
            })?;
            *pass_counts.entry(tier).or_insert(0) += 1;
            practice_pools.entry(tier).or_default().push(c.seed);
            if meets_target {
                challenge_pools.entry(tier).or_default().push(c.seed);
            }
        } else {
            let reason = match &c.outcome.validation_error {
                Some(err) => format!("validation_error:{}", err.message_key()),
                None => "incomplete_trace".to_string(),
            };
            fail_writer.write_record(&TraceFailRecord {
                seed: c.seed,
                tier,
                reason,
            })?;
            *fail_counts.entry(tier).or_insert(0) += 1;
        }
    }
    let pass_stats = pass_writer.finish()?;
    let fail_stats = fail_writer.finish()?;

    // Seed manifest: practice pools take every gate-passing seed; challenge
    // pools additionally require the feasibility floor.
    let mut manifest = SeedManifest::new();
    for tier in Tier::ALL {
        if let Some(seeds) = practice_pools.get(&tier) {
            manifest.insert_pool(
                Mode::Practice,
                tier,
                TierPool {
                    seeds: seeds.clone(),
                    target_score: None,
                },
            );
        }
        if let Some(seeds) = challenge_pools.get(&tier) {
            manifest.insert_pool(
                Mode::Challenge,
                tier,
                TierPool {
                    seeds: seeds.clone(),
                    target_score: Some(targets[&tier]),
                },
            );
        }
    }
    save_manifest(run_dir.join("seed_manifest.json"), &manifest)?;

    let mut digests = BTreeMap::new();
    digests.insert(
        "calibration_results.jsonl".to_string(),
        results_stats.sha256_hex,
    );
    digests.insert("trace_pass.jsonl".to_string(), pass_stats.sha256_hex);
    digests.insert("trace_fail.jsonl".to_string(), fail_stats.sha256_hex);

    let tiers: Vec<TierSummary> = Tier::ALL
        .iter()
        .map(|&tier| TierSummary {
            tier,
            seed_count: combined.iter().filter(|(_, _, t)| *t == tier).count(),
            target_score: targets[&tier],
            trace_pass: pass_counts.get(&tier).copied().unwrap_or(0),
            trace_fail: fail_counts.get(&tier).copied().unwrap_or(0),
            challenge_pool: challenge_pools.get(&tier).map_or(0, Vec::len),
        })
        .collect();

    let summary = Summary {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        prng: PRNG_ID.to_string(),
        policy: POLICY_ID.to_string(),
        run_id: cfg.run_id.clone(),
        seed_source: cfg.seeds.clone(),
        seeds_evaluated: seeds.len(),
        top_k: cfg.top_k,
        rollouts: cfg.rollouts,
        boundary_band: cfg.boundary_band,
        stage_b_evaluated: stage_b.len(),
        cutoff_policy: "equal_frequency".to_string(),
        cutoffs: vec![c1, c2],
        target_quantile: cfg.target_quantile,
        tiers,
        digests,
    };
    let summary_json = serde_json::to_string_pretty(&summary)
        .map_err(|e| format!("summary serialize error: {e}"))?;
    fs::write(run_dir.join("summary.json"), summary_json)
        .map_err(|e| format!("summary write error: {e}"))?;

    println!(
        "[calibrate] done: {} pass, {} fail, artifacts in {}",
        pass_counts.values().sum::<usize>(),
        fail_counts.values().sum::<usize>(),
        run_dir.display()
    );

    Ok(CalibrationReport { run_dir, summary })
}
