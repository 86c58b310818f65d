use rand::SeedableRng;
use rand_pcg::Pcg64;

use sevendraw::{
    load_manifest, save_manifest, start_from_manifest, EngineError, Mode, SeedManifest, Tier,
    TierPool, PRNG_ID,
};

fn sample_manifest() -> SeedManifest {
    let mut manifest = SeedManifest::new();
    manifest.insert_pool(
        Mode::Practice,
        Tier::Easy,
        TierPool {
            seeds: vec![11, 12, 13],
            target_score: None,
        },
    );
    manifest.insert_pool(
        Mode::Challenge,
        Tier::Medium,
        TierPool {
            seeds: vec![21, 22],
            target_score: Some(450),
        },
    );
    manifest
}

#[test]
fn manifest_round_trips_through_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("seed_manifest.json");
    let manifest = sample_manifest();
    save_manifest(&path, &manifest).expect("save");
    let loaded = load_manifest(&path).expect("load");
    assert_eq!(loaded, manifest);
    assert_eq!(loaded.prng, PRNG_ID);
}

#[test]
fn manifest_rejects_prng_mismatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("seed_manifest.json");
    let mut manifest = sample_manifest();
    manifest.prng = "some-other-shuffle/v9".to_string();
    save_manifest(&path, &manifest).expect("save");
    let err = load_manifest(&path).expect_err("must reject");
    assert!(err.contains("PRNG mismatch"), "unexpected error: {err}");
}

#[test]
fn missing_pool_is_a_contract_violation() {
    let manifest = sample_manifest();
    let err = manifest
        .pool(Mode::Challenge, Tier::Hard)
        .expect_err("no hard challenge pool");
    assert_eq!(
        err,
        EngineError::SeedManifestMissing {
            mode: "challenge".to_string(),
            tier: "hard".to_string()
        }
    );
    assert_eq!(err.message_key(), "error.seed_manifest_missing");
}

#[test]
fn sampling_is_deterministic_for_a_fixed_rng() {
    let manifest = sample_manifest();
    let mut rng_a = Pcg64::seed_from_u64(7);
    let mut rng_b = Pcg64::seed_from_u64(7);
    let a = manifest
        .sample_seed(Mode::Practice, Tier::Easy, &mut rng_a)
        .expect("sample");
    let b = manifest
        .sample_seed(Mode::Practice, Tier::Easy, &mut rng_b)
        .expect("sample");
    assert_eq!(a, b);
    assert!(manifest.practice[&Tier::Easy].seeds.contains(&a));
}

#[test]
fn start_resolves_seed_and_target_from_manifest() {
    let manifest = sample_manifest();
    let mut rng = Pcg64::seed_from_u64(3);

    let (state, events) =
        start_from_manifest(&manifest, Mode::Challenge, Tier::Medium, Some(21), &mut rng)
            .expect("start");
    assert_eq!(state.mode(), Mode::Challenge);
    assert_eq!(state.target_score(), Some(450));
    assert_eq!(events[0].message_key, "game.started");
    assert_eq!(events[0].params["seed"], 21);

    // Omitted seed: sampled from the pool.
    let (state, _) = start_from_manifest(&manifest, Mode::Practice, Tier::Easy, None, &mut rng)
        .expect("start");
    assert_eq!(state.mode(), Mode::Practice);
    assert_eq!(state.target_score(), None);

    let err = start_from_manifest(&manifest, Mode::Practice, Tier::Hard, None, &mut rng)
        .expect_err("no pool");
    assert_eq!(err.message_key(), "error.seed_manifest_missing");
}

#[test]
fn manifest_json_shape() {
    let manifest = sample_manifest();
    let json = serde_json::to_value(&manifest).expect("serialize");
    assert_eq!(json["version"], 1);
    assert_eq!(json["prng"], PRNG_ID);
    assert_eq!(json["practice"]["easy"]["seeds"][0], 11);
    assert_eq!(json["challenge"]["medium"]["target_score"], 450);
    // Practice pools omit the target entirely.
    assert!(json["practice"]["easy"].get("target_score").is_none());
}
