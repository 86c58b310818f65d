use crate::cards::Card;
use crate::engine::classify::{classify, HandCategory};

/// Gameplay-only jackpot award. Intentionally extreme: a straight flush is
/// a celebration event, not a data point.
pub const JACKPOT_POINTS: u32 = 999_999;

/// Gameplay points for a classified 5-card category. This table is the
/// player-facing scoring universe and the only place gameplay points are
/// defined; the classifier never carries points logic.
#[inline]
pub fn gameplay_points(category: HandCategory) -> u32 {
    match category {
        HandCategory::HighCard => 50,
        HandCategory::OnePair => 70,
        HandCategory::TwoPair => 150,
        HandCategory::ThreeOfAKind => 250,
        HandCategory::Straight => 300,
        HandCategory::Flush => 360,
        HandCategory::FullHouse => 440,
        HandCategory::FourOfAKind => 730,
        HandCategory::StraightFlush => JACKPOT_POINTS,
    }
}

/// True for categories treated as jackpots in gameplay. Jackpot categories
/// are excluded from calibration statistics and policy modeling.
#[inline]
pub fn is_jackpot_category(category: HandCategory) -> bool {
    matches!(category, HandCategory::StraightFlush)
}

/// Collapse a gameplay category into its model-world equivalent. A straight
/// flush is both a straight and a flush; the model world treats it as
/// `Flush`, preserving strength ordering without an ultra-rare outlier.
#[inline]
pub fn normalize_model_category(category: HandCategory) -> HandCategory {
    match category {
        HandCategory::StraightFlush => HandCategory::Flush,
        other => other,
    }
}

/// Model-world points (policy and calibration). Identical to gameplay
/// except the jackpot collapse.
#[inline]
pub fn model_points(category: HandCategory) -> u32 {
    gameplay_points(normalize_model_category(category))
}

/// Classify and score exactly 5 cards in gameplay context.
#[inline]
pub fn score_play_gameplay(cards: &[Card; 5]) -> (HandCategory, u32) {
    let category = classify(cards);
    (category, gameplay_points(category))
}

/// Classify and score exactly 5 cards in model context. The returned
/// category is already normalized to the model world.
#[inline]
pub fn score_play_model(cards: &[Card; 5]) -> (HandCategory, u32) {
    let category = normalize_model_category(classify(cards));
    (category, gameplay_points(category))
}

/// Development-time consistency check over the scoring tables. If the
/// category universe changes, scoring must be updated explicitly.
pub fn validate_scoring_tables() -> Result<(), String> {
    if gameplay_points(HandCategory::HighCard) == 0 {
        return Err("HIGH_CARD gameplay points must be > 0".to_string());
    }
    // Non-jackpot strength ordering must be strictly increasing.
    let ladder: Vec<u32> = HandCategory::ALL
        .iter()
        .filter(|c| !is_jackpot_category(**c))
        .map(|c| gameplay_points(*c))
        .collect();
    for pair in ladder.windows(2) {
        if pair[0] >= pair[1] {
            return Err(format!(
                "gameplay points must increase with category strength ({} >= {})",
                pair[0], pair[1]
            ));
        }
    }
    for c in HandCategory::ALL {
        if model_points(c) > gameplay_points(c) {
            return Err(format!(
                "model points must never exceed gameplay points (category {})",
                c.as_str()
            ));
        }
        if !is_jackpot_category(c) && model_points(c) != gameplay_points(c) {
            return Err(format!(
                "model and gameplay points must agree outside jackpots (category {})",
                c.as_str()
            ));
        }
    }
    Ok(())
}
