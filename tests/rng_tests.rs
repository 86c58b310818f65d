use sevendraw::{shuffled_deck, standard_deck};

#[test]
fn shuffle_stability_same_seed() {
    let a = shuffled_deck(0xDEAD_BEEF_u64);
    let b = shuffled_deck(0xDEAD_BEEF_u64);
    assert_eq!(
        a, b,
        "shuffled_deck must produce identical permutations for the same seed"
    );
}

#[test]
fn shuffle_differs_across_seeds() {
    let a = shuffled_deck(1);
    let b = shuffled_deck(2);
    assert_ne!(a, b, "different seeds should give different permutations");
}

#[test]
fn shuffle_is_a_permutation() {
    for seed in [0u64, 1, 42, u64::MAX] {
        let deck = shuffled_deck(seed);
        let mut seen = [false; 52];
        for card in deck {
            let i = card.index() as usize;
            assert!(!seen[i], "card {card} repeated for seed {seed}");
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

#[test]
fn shuffle_moves_something() {
    // Astronomically unlikely to be the identity permutation; a fixed seed
    // makes this a deterministic regression check rather than a gamble.
    let deck = shuffled_deck(123_456);
    assert_ne!(deck, standard_deck());
}

#[test]
fn shuffle_stability_repeated() {
    // Determinism scenario: record the permutation once, then re-derive it
    // many times.
    let first = shuffled_deck(123_456);
    for _ in 0..1000 {
        assert_eq!(shuffled_deck(123_456), first);
    }
}
