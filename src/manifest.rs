use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::rng::PRNG_ID;
use crate::types::{Mode, Tier};

pub const MANIFEST_VERSION: u32 = 1;

/// One tier's runtime seed pool. `target_score` is present for challenge
/// pools only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPool {
    pub seeds: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_score: Option<u64>,
}

/// Seed pools grouped by tier, separated for practice and challenge.
/// Produced by the calibration pipeline, consumed by the start factory.
/// The recorded PRNG identifier must match the running engine's; a
/// mismatch means the stored seeds describe different decks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedManifest {
    pub version: u32,
    pub prng: String,
    pub practice: BTreeMap<Tier, TierPool>,
    pub challenge: BTreeMap<Tier, TierPool>,
}

impl Default for SeedManifest {
    fn default() -> Self {
        SeedManifest::new()
    }
}

impl SeedManifest {
    pub fn new() -> SeedManifest {
        SeedManifest {
            version: MANIFEST_VERSION,
            prng: PRNG_ID.to_string(),
            practice: BTreeMap::new(),
            challenge: BTreeMap::new(),
        }
    }

    #[inline]
    fn pools(&self, mode: Mode) -> &BTreeMap<Tier, TierPool> {
        match mode {
            Mode::Practice => &self.practice,
            Mode::Challenge => &self.challenge,
        }
    }

    pub fn insert_pool(&mut self, mode: Mode, tier: Tier, pool: TierPool) {
        let pools = match mode {
            Mode::Practice => &mut self.practice,
            Mode::Challenge => &mut self.challenge,
        };
        pools.insert(tier, pool);
    }

    /// The pool for (mode, tier); a missing or empty pool is the
    /// `seed_manifest_missing` contract violation.
    pub fn pool(&self, mode: Mode, tier: Tier) -> Result<&TierPool, EngineError> {
        match self.pools(mode).get(&tier) {
            Some(pool) if !pool.seeds.is_empty() => Ok(pool),
            _ => Err(EngineError::SeedManifestMissing {
                mode: mode.as_str().to_string(),
                tier: tier.as_str().to_string(),
            }),
        }
    }

    /// Sample a seed uniformly from the pool.
    pub fn sample_seed<R: Rng>(
        &self,
        mode: Mode,
        tier: Tier,
        rng: &mut R,
    ) -> Result<u64, EngineError> {
        let pool = self.pool(mode, tier)?;
        let i = rng.gen_range(0..pool.seeds.len());
        Ok(pool.seeds[i])
    }

    pub fn target_score(&self, mode: Mode, tier: Tier) -> Result<Option<u64>, EngineError> {
        Ok(self.pool(mode, tier)?.target_score)
    }
}

/// Save a manifest as pretty JSON. Deterministic bytes: BTreeMap pools and
/// no timestamps.
pub fn save_manifest<P: AsRef<Path>>(path: P, manifest: &SeedManifest) -> Result<(), String> {
    let data = serde_json::to_string_pretty(manifest)
        .map_err(|e| format!("manifest serialize error: {e}"))?;
    fs::write(path.as_ref(), data).map_err(|e| format!("manifest write error: {e}"))?;
    Ok(())
}

/// Load a manifest, rejecting version or PRNG mismatches early: stored
/// seeds are only meaningful under the exact shuffle construction that
/// produced them.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<SeedManifest, String> {
    let data =
        fs::read_to_string(path.as_ref()).map_err(|e| format!("manifest read error: {e}"))?;
    let manifest: SeedManifest =
        serde_json::from_str(&data).map_err(|e| format!("manifest parse error: {e}"))?;
    if manifest.version != MANIFEST_VERSION {
        return Err(format!(
            "manifest version mismatch: expected {MANIFEST_VERSION}, got {}",
            manifest.version
        ));
    }
    if manifest.prng != PRNG_ID {
        return Err(format!(
            "manifest PRNG mismatch: expected {PRNG_ID:?}, got {:?}",
            manifest.prng
        ));
    }
    Ok(manifest)
}
