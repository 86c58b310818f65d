use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Five-card hand categories, weakest first. A royal flush is reported as
/// `StraightFlush`; there is no separate category for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandCategory {
    pub const ALL: [HandCategory; 9] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
    ];

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            HandCategory::HighCard => "HIGH_CARD",
            HandCategory::OnePair => "ONE_PAIR",
            HandCategory::TwoPair => "TWO_PAIR",
            HandCategory::ThreeOfAKind => "THREE_OF_A_KIND",
            HandCategory::Straight => "STRAIGHT",
            HandCategory::Flush => "FLUSH",
            HandCategory::FullHouse => "FULL_HOUSE",
            HandCategory::FourOfAKind => "FOUR_OF_A_KIND",
            HandCategory::StraightFlush => "STRAIGHT_FLUSH",
        }
    }
}

/// Classify exactly 5 cards into a category. Pure and order-invariant;
/// returns only the category, never points (scoring is policy, not fact).
///
/// Distinctness of the 5 cards is a caller invariant: the engine only ever
/// classifies cards drawn from a real deck.
pub fn classify(cards: &[Card; 5]) -> HandCategory {
    debug_assert!(
        {
            let mut seen = [false; 52];
            cards.iter().all(|c| {
                let i = c.index() as usize;
                !std::mem::replace(&mut seen[i], true)
            })
        },
        "duplicate cards in classify input"
    );

    // Rank histogram indexed by rank value 2..=14.
    let mut rank_counts = [0u8; 15];
    for c in cards {
        rank_counts[c.rank_value() as usize] += 1;
    }

    let first_suit = cards[0].suit();
    let is_flush = cards.iter().all(|c| c.suit() == first_suit);
    let is_straight = is_straight_5(&rank_counts);

    // Multiplicity profile, descending (e.g. four of a kind -> [4, 1]).
    let mut mults: Vec<u8> = rank_counts.iter().copied().filter(|&n| n > 0).collect();
    mults.sort_unstable_by(|a, b| b.cmp(a));

    if is_straight && is_flush {
        return HandCategory::StraightFlush;
    }
    if mults[0] == 4 {
        return HandCategory::FourOfAKind;
    }
    if mults[0] == 3 && mults.len() == 2 {
        return HandCategory::FullHouse;
    }
    if is_flush {
        return HandCategory::Flush;
    }
    if is_straight {
        return HandCategory::Straight;
    }
    if mults[0] == 3 {
        return HandCategory::ThreeOfAKind;
    }
    if mults[0] == 2 && mults[1] == 2 {
        return HandCategory::TwoPair;
    }
    if mults[0] == 2 {
        return HandCategory::OnePair;
    }
    HandCategory::HighCard
}

/// Five distinct consecutive ranks, with the wheel A-2-3-4-5 as the one
/// special case (its top rank is the 5). No wrap-around straights.
fn is_straight_5(rank_counts: &[u8; 15]) -> bool {
    if rank_counts.iter().any(|&n| n > 1) {
        return false;
    }
    // Wheel: A,2,3,4,5.
    if rank_counts[14] == 1
        && rank_counts[2] == 1
        && rank_counts[3] == 1
        && rank_counts[4] == 1
        && rank_counts[5] == 1
    {
        return true;
    }
    let lo = rank_counts.iter().position(|&n| n == 1);
    let hi = rank_counts.iter().rposition(|&n| n == 1);
    match (lo, hi) {
        (Some(lo), Some(hi)) => hi - lo == 4,
        _ => false,
    }
}
