use sevendraw::{classify, Card, HandCategory};

fn hand(cards: [&str; 5]) -> [Card; 5] {
    cards.map(|c| c.parse().expect("valid RS card"))
}

#[test]
fn witness_hands_per_category() {
    let cases: [([&str; 5], HandCategory); 9] = [
        (["AS", "KD", "7H", "4C", "2D"], HandCategory::HighCard),
        (["AS", "AD", "7H", "4C", "2D"], HandCategory::OnePair),
        (["AS", "AD", "7H", "7C", "2D"], HandCategory::TwoPair),
        (["AS", "AD", "AH", "7C", "2D"], HandCategory::ThreeOfAKind),
        (["9S", "TD", "JH", "QC", "KD"], HandCategory::Straight),
        (["AS", "KS", "7S", "4S", "2S"], HandCategory::Flush),
        (["AS", "AD", "AH", "7C", "7D"], HandCategory::FullHouse),
        (["AS", "AD", "AH", "AC", "7D"], HandCategory::FourOfAKind),
        (["9S", "TS", "JS", "QS", "KS"], HandCategory::StraightFlush),
    ];
    for (cards, expected) in cases {
        assert_eq!(classify(&hand(cards)), expected, "hand {cards:?}");
    }
}

#[test]
fn wheel_is_a_straight() {
    assert_eq!(
        classify(&hand(["AS", "2C", "3D", "4H", "5S"])),
        HandCategory::Straight
    );
}

#[test]
fn steel_wheel_is_a_straight_flush() {
    assert_eq!(
        classify(&hand(["AS", "2S", "3S", "4S", "5S"])),
        HandCategory::StraightFlush
    );
}

#[test]
fn royal_flush_reports_as_straight_flush() {
    assert_eq!(
        classify(&hand(["TS", "JS", "QS", "KS", "AS"])),
        HandCategory::StraightFlush
    );
}

#[test]
fn ace_high_straight_recognized() {
    assert_eq!(
        classify(&hand(["TS", "JD", "QH", "KC", "AS"])),
        HandCategory::Straight
    );
}

#[test]
fn no_wrap_around_straight() {
    // Q-K-A-2-3 must not count as a straight.
    assert_eq!(
        classify(&hand(["QS", "KD", "AH", "2C", "3D"])),
        HandCategory::HighCard
    );
}

#[test]
fn classify_is_permutation_invariant() {
    let base = ["AS", "AD", "AH", "7C", "7D"];
    let expected = classify(&hand(base));
    // A handful of distinct permutations is enough to catch order use.
    let perms = [
        ["7D", "7C", "AH", "AD", "AS"],
        ["AD", "7C", "AS", "7D", "AH"],
        ["AH", "AS", "7D", "AD", "7C"],
        ["7C", "AS", "AD", "AH", "7D"],
    ];
    for p in perms {
        assert_eq!(classify(&hand(p)), expected, "permutation {p:?}");
    }
}

#[test]
fn near_flush_is_not_a_flush() {
    assert_eq!(
        classify(&hand(["AS", "KS", "7S", "4S", "2H"])),
        HandCategory::HighCard
    );
}
