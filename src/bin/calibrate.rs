use std::path::PathBuf;

use clap::Parser;

use sevendraw::calibrate::{run_pipeline, CalibrationConfig, SeedSource};
use sevendraw::{declare_context, ContextTag, PrivilegedContext};

#[derive(Debug, Parser)]
#[command(name = "calibrate", about = "Sevendraw offline seed calibration pipeline")]
struct Args {
    /// Run identifier; artifacts land in <out>/<run-id>/
    #[arg(long)]
    run_id: String,

    /// Artifact root directory
    #[arg(long, default_value = "artifacts/pipeline")]
    out: PathBuf,

    /// First seed of the contiguous candidate range
    #[arg(long, default_value_t = 0)]
    seed_start: u64,

    /// Number of seeds to calibrate
    #[arg(long, default_value_t = 1000)]
    seed_count: u64,

    /// Explicit comma-separated seed list (overrides the range)
    #[arg(long)]
    seeds: Option<String>,

    /// Candidates per decision point for stage-B rollouts
    #[arg(long, default_value_t = 10)]
    top_k: usize,

    /// Rollouts per candidate
    #[arg(long, default_value_t = 128)]
    rollouts: usize,

    /// Boundary band as a fraction of the score span
    #[arg(long, default_value_t = 0.1)]
    band: f64,

    /// Challenge target quantile within each tier
    #[arg(long, default_value_t = 0.35)]
    target_quantile: f64,

    /// Disable progress bars
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn parse_seed_list(s: &str) -> Result<Vec<u64>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u64>()
                .map_err(|e| format!("invalid seed '{t}': {e}"))
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // This process is a calibration worker: the ordered-deck information
    // set is open here and nowhere else.
    declare_context(ContextTag::Calibration)?;
    let ctx = PrivilegedContext::acquire()?;

    let seeds = match &args.seeds {
        Some(list) => SeedSource::List {
            seeds: parse_seed_list(list)?,
        },
        None => SeedSource::Range {
            start: args.seed_start,
            count: args.seed_count,
        },
    };

    let mut cfg = CalibrationConfig::new(args.run_id, args.out, seeds);
    cfg.top_k = args.top_k;
    cfg.rollouts = args.rollouts;
    cfg.boundary_band = args.band;
    cfg.target_quantile = args.target_quantile;
    cfg.progress = !args.quiet;

    let report = run_pipeline(&ctx, &cfg)?;
    println!(
        "[calibrate] summary written to {}",
        report.run_dir.join("summary.json").display()
    );
    Ok(())
}
