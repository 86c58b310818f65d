use sevendraw::{standard_deck, Card, Rank, Suit};

#[test]
fn rs_round_trip_all_52() {
    for card in standard_deck() {
        let rs = card.to_string();
        assert_eq!(rs.len(), 2);
        let parsed: Card = rs.parse().expect("valid RS string");
        assert_eq!(parsed, card);
    }
}

#[test]
fn rs_rejects_malformed_input() {
    for bad in ["", "A", "ASX", "1S", "AX", "as", "A "] {
        assert!(bad.parse::<Card>().is_err(), "expected parse failure for {bad:?}");
    }
}

#[test]
fn compact_index_layout() {
    // index = rank_index * 4 + suit_index
    let c = Card::new(Rank::Two, Suit::Spades);
    assert_eq!(c.index(), 0);
    let c = Card::new(Rank::Two, Suit::Clubs);
    assert_eq!(c.index(), 3);
    let c = Card::new(Rank::Ace, Suit::Clubs);
    assert_eq!(c.index(), 51);
    assert!(Card::from_index(52).is_err());
    assert_eq!(Card::from_index(17).expect("in range").index(), 17);
}

#[test]
fn canonical_deck_order() {
    let deck = standard_deck();
    assert_eq!(deck.len(), 52);
    assert_eq!(deck[0].to_string(), "2S");
    assert_eq!(deck[1].to_string(), "2H");
    assert_eq!(deck[2].to_string(), "2D");
    assert_eq!(deck[3].to_string(), "2C");
    assert_eq!(deck[4].to_string(), "3S");
    assert_eq!(deck[51].to_string(), "AC");
    // Ord on Card is the canonical deck order.
    for pair in deck.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn serde_uses_rs_strings() {
    let card: Card = "TD".parse().expect("valid");
    let json = serde_json::to_string(&card).expect("serialize");
    assert_eq!(json, "\"TD\"");
    let back: Card = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, card);
}

#[test]
fn rank_values_are_ace_high() {
    assert_eq!(Rank::Two.value(), 2);
    assert_eq!(Rank::Ten.value(), 10);
    assert_eq!(Rank::Ace.value(), 14);
    let c: Card = "AS".parse().expect("valid");
    assert_eq!(c.rank_value(), 14);
}
