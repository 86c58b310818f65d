use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{json, Value};

use crate::cards::{Card, Suit};
use crate::engine::classify::{classify, HandCategory};
use crate::engine::score::{model_points, normalize_model_category};
use crate::events::AI_REASON_HEURISTIC;
use crate::state::PublicView;
use crate::types::Action;

use super::candidates::{discard_templates, play_candidates};

/// Explicit completions kept per DISCARD candidate; everything below the
/// cut contributes at the baseline value.
const TOP_COMPLETIONS: usize = 5;

/// A ranked candidate action under the order-unknown information set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub action: Action,
    pub expected_value: f64,
    pub variance_proxy: f64,
    pub rule: &'static str,
    pub detail: Value,
}

/// A single-step recommendation: the policy's chosen action plus its
/// explanation key and structured parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub action: Action,
    pub explanation_key: String,
    pub params: Value,
}

/// Remaining-deck multiset folded into rank and suit tallies.
struct LiveCounts {
    total: usize,
    by_rank: [u8; 15],
    by_suit: [u8; 4],
}

impl LiveCounts {
    fn from_view(view: &PublicView) -> LiveCounts {
        let mut by_rank = [0u8; 15];
        let mut by_suit = [0u8; 4];
        for (card, n) in &view.deck_remaining_counts {
            by_rank[card.rank_value() as usize] += n;
            by_suit[card.suit().index()] += n;
        }
        LiveCounts {
            total: view.deck_remaining_count,
            by_rank,
            by_suit,
        }
    }
}

#[inline]
fn choose(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut acc = 1.0_f64;
    for i in 0..k {
        acc = acc * ((n - i) as f64) / ((i + 1) as f64);
    }
    acc
}

/// P(at least one card from a group of `live` among `k` draws without
/// replacement from `total`).
#[inline]
fn prob_any(live: usize, total: usize, k: usize) -> f64 {
    if live == 0 || k == 0 || total == 0 {
        return 0.0;
    }
    1.0 - choose(total - live.min(total), k) / choose(total, k)
}

/// P(at least `need` cards of a group of `live` among `k` draws);
/// hypergeometric tail.
fn prob_at_least(live: usize, total: usize, need: usize, k: usize) -> f64 {
    if need > k || live < need || total == 0 {
        return 0.0;
    }
    let denom = choose(total, k);
    let mut p = 0.0;
    for j in need..=k.min(live) {
        p += choose(live, j) * choose(total - live, k - j);
    }
    p / denom
}

/// P(every listed rank group is hit at least once in `k` draws); exact
/// inclusion-exclusion over the missing groups (at most 3 of them here).
fn prob_cover(lives: &[usize], total: usize, k: usize) -> f64 {
    if lives.len() > k || lives.iter().any(|&l| l == 0) {
        return 0.0;
    }
    let denom = choose(total, k);
    let mut p = 0.0;
    for mask in 0..(1u32 << lives.len()) {
        let excluded: usize = lives
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &l)| l)
            .sum();
        let sign = if mask.count_ones() % 2 == 0 { 1.0 } else { -1.0 };
        p += sign * choose(total.saturating_sub(excluded), k);
    }
    (p / denom).clamp(0.0, 1.0)
}

/// Rank-multiplicity category of an arbitrary card set (pairs and better
/// that are already locked in, regardless of what else is drawn).
fn profile_category(rank_counts: &[u8; 15]) -> HandCategory {
    let mut pairs = 0;
    let mut trips = 0;
    for &n in rank_counts.iter() {
        if n >= 4 {
            return HandCategory::FourOfAKind;
        }
        if n == 3 {
            trips += 1;
        }
        if n == 2 {
            pairs += 1;
        }
    }
    if trips >= 2 || (trips == 1 && pairs >= 1) {
        HandCategory::FullHouse
    } else if trips == 1 {
        HandCategory::ThreeOfAKind
    } else if pairs >= 2 {
        HandCategory::TwoPair
    } else if pairs == 1 {
        HandCategory::OnePair
    } else {
        HandCategory::HighCard
    }
}

/// The 5-rank straight windows, wheel first, expressed as rank values.
fn straight_windows() -> [[u8; 5]; 10] {
    let mut windows = [[0u8; 5]; 10];
    windows[0] = [14, 2, 3, 4, 5];
    for (w, window) in windows.iter_mut().enumerate().skip(1) {
        for (i, slot) in window.iter_mut().enumerate() {
            *slot = (w + 1 + i) as u8;
        }
    }
    windows
}

/// Best category already achievable with the given cards alone: the rank
/// profile, plus flush/straight when five suited / five consecutive cards
/// are actually present.
fn locked_in_category(cards: &[Card]) -> HandCategory {
    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        rank_counts[c.rank_value() as usize] += 1;
        suit_counts[c.suit().index()] += 1;
    }
    let mut best = profile_category(&rank_counts);
    if suit_counts.iter().any(|&n| n >= 5) {
        best = best.max(HandCategory::Flush);
    }
    let has_straight = straight_windows()
        .iter()
        .any(|w| w.iter().all(|&r| rank_counts[r as usize] > 0));
    if has_straight {
        best = best.max(HandCategory::Straight);
    }
    best
}

/// Rank every hand index from most to least expendable. Retention weighs
/// pair partners in hand, live same-rank outs, flush proximity, straight
/// window coverage and a small rank baseline; ties break on lower index.
pub fn retention_order(view: &PublicView) -> Vec<usize> {
    let live = LiveCounts::from_view(view);
    let mut rank_in_hand = [0u8; 15];
    let mut suit_in_hand = [0u8; 4];
    for c in &view.hand {
        rank_in_hand[c.rank_value() as usize] += 1;
        suit_in_hand[c.suit().index()] += 1;
    }
    let windows = straight_windows();

    let mut scored: Vec<(usize, f64)> = view
        .hand
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let rv = card.rank_value() as usize;
            let si = card.suit().index();
            let partners = f64::from(rank_in_hand[rv] - 1);
            let rank_outs = f64::from(live.by_rank[rv]);
            let suited = f64::from(suit_in_hand[si] - 1);
            let suit_outs = f64::from(live.by_suit[si]);

            let flush_term = if suit_in_hand[si] >= 4 {
                suited * 55.0 + suit_outs * 6.0
            } else {
                suited * 25.0 + suit_outs * 3.0
            };
            let straight_cover = windows
                .iter()
                .filter(|w| w.contains(&(rv as u8)))
                .filter(|w| {
                    w.iter()
                        .all(|&r| rank_in_hand[r as usize] > 0 || live.by_rank[r as usize] > 0)
                })
                .count() as f64;

            let score = partners * 220.0
                + rank_outs * 18.0
                + flush_term
                + straight_cover * 9.0
                + f64::from(card.rank_value()) * 1.5;
            (i, score)
        })
        .collect();

    // Worst first; equal retention discards the lower index first.
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(i, _)| i).collect()
}

struct Completion {
    prob: f64,
    value: f64,
    kind: &'static str,
}

/// Sampling-free expected value of discarding `indices`: the few impactful
/// completions of the retained cards (pair upgrades, flush, straight) are
/// weighted by their draw probability under the remaining multiset; the
/// residual mass sits at the value already locked in.
fn discard_expected_value(view: &PublicView, indices: &[usize]) -> (f64, f64, Value) {
    let live = LiveCounts::from_view(view);
    let k = indices.len();
    let retained: Vec<Card> = view
        .hand
        .iter()
        .enumerate()
        .filter(|(i, _)| !indices.contains(i))
        .map(|(_, c)| *c)
        .collect();

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for c in &retained {
        rank_counts[c.rank_value() as usize] += 1;
        suit_counts[c.suit().index()] += 1;
    }

    let baseline_category = locked_in_category(&retained);
    let baseline = f64::from(model_points(baseline_category));

    let mut completions: Vec<Completion> = Vec::new();

    // Rank upgrades: draw another of a rank we already hold.
    for rv in 2..=14usize {
        if rank_counts[rv] == 0 || live.by_rank[rv] == 0 {
            continue;
        }
        let mut upgraded = rank_counts;
        upgraded[rv] += 1;
        let value = f64::from(model_points(profile_category(&upgraded)));
        if value > baseline {
            completions.push(Completion {
                prob: prob_any(live.by_rank[rv] as usize, live.total, k),
                value,
                kind: "rank_upgrade",
            });
        }
    }

    // Flush completion: missing suited cards within the draw budget.
    let flush_value = f64::from(model_points(HandCategory::Flush));
    if flush_value > baseline {
        for s in Suit::ALL {
            let held = suit_counts[s.index()] as usize;
            if held >= 5 || held + k < 5 {
                continue;
            }
            let need = 5 - held;
            let p = prob_at_least(live.by_suit[s.index()] as usize, live.total, need, k);
            if p > 0.0 {
                completions.push(Completion {
                    prob: p,
                    value: flush_value,
                    kind: "flush_draw",
                });
            }
        }
    }

    // Straight completion: windows missing at most k live ranks.
    let straight_value = f64::from(model_points(HandCategory::Straight));
    if straight_value > baseline {
        for w in straight_windows() {
            let missing: Vec<usize> = w
                .iter()
                .filter(|&&r| rank_counts[r as usize] == 0)
                .map(|&r| live.by_rank[r as usize] as usize)
                .collect();
            if missing.is_empty() || missing.len() > k {
                continue;
            }
            let p = prob_cover(&missing, live.total, k);
            if p > 0.0 {
                completions.push(Completion {
                    prob: p,
                    value: straight_value,
                    kind: "straight_draw",
                });
            }
        }
    }

    // Keep the top-M most promising completions; deterministic order.
    completions.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then(b.prob.partial_cmp(&a.prob).unwrap_or(Ordering::Equal))
            .then(a.kind.cmp(b.kind))
    });
    completions.truncate(TOP_COMPLETIONS);

    // Sequentially discounted mass keeps overlapping completion events from
    // claiming more than the whole probability space.
    let mut mass = 0.0_f64;
    let mut ev = 0.0_f64;
    for c in &completions {
        let p_eff = c.prob * (1.0 - mass);
        ev += p_eff * c.value;
        mass += p_eff;
    }
    ev += (1.0 - mass) * baseline;

    let mut variance = (1.0 - mass) * (baseline - ev) * (baseline - ev);
    let mut mass_acc = 0.0_f64;
    for c in &completions {
        let p_eff = c.prob * (1.0 - mass_acc);
        variance += p_eff * (c.value - ev) * (c.value - ev);
        mass_acc += p_eff;
    }

    let detail = json!({
        "baseline_category": baseline_category,
        "discard_count": k,
        "top_completions": completions
            .iter()
            .map(|c| json!({ "kind": c.kind, "prob": c.prob, "value": c.value }))
            .collect::<Vec<_>>(),
    });
    (ev, variance, detail)
}

/// Deterministic action-shape ordering used for final tie-breaks: fewer
/// discarded cards first, then the lexicographically smaller index set,
/// then PLAY before DISCARD.
pub(crate) fn action_shape_order(a: &Action, b: &Action) -> Ordering {
    let a_discards = if a.is_play() { 0 } else { a.selected_indices().len() };
    let b_discards = if b.is_play() { 0 } else { b.selected_indices().len() };
    a_discards
        .cmp(&b_discards)
        .then_with(|| a.selected_indices().cmp(b.selected_indices()))
        .then_with(|| b.is_play().cmp(&a.is_play()))
}

fn better(a: &ScoredCandidate, b: &ScoredCandidate, p_remaining: u8) -> Ordering {
    b.expected_value
        .partial_cmp(&a.expected_value)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            if p_remaining == 1 {
                // Must play to finish: a play outranks any discard.
                b.action.is_play().cmp(&a.action.is_play())
            } else {
                a.variance_proxy
                    .partial_cmp(&b.variance_proxy)
                    .unwrap_or(Ordering::Equal)
            }
        })
        .then_with(|| action_shape_order(&a.action, &b.action))
}

/// Rank every candidate action for the given public view, best first.
/// A pure function of the order-unknown information set: two states with
/// the same public projection rank identically, whatever the hidden deck
/// order is.
pub fn rank_candidates(view: &PublicView) -> Vec<ScoredCandidate> {
    let mut out: Vec<ScoredCandidate> = Vec::new();
    if view.p_remaining == 0 {
        return out;
    }

    for idx in play_candidates(view.hand.len()) {
        let cards = [
            view.hand[idx[0]],
            view.hand[idx[1]],
            view.hand[idx[2]],
            view.hand[idx[3]],
            view.hand[idx[4]],
        ];
        let category = normalize_model_category(classify(&cards));
        let points = model_points(category);
        out.push(ScoredCandidate {
            action: Action::play(idx.to_vec()),
            expected_value: f64::from(points),
            variance_proxy: 0.0,
            rule: "play_made_hand",
            detail: json!({ "category": category, "points": points }),
        });
    }

    if view.d_remaining > 0 {
        let worst = retention_order(view);
        for indices in discard_templates(&worst, view.d_remaining, view.hand.len()) {
            let (ev, variance, detail) = discard_expected_value(view, &indices);
            out.push(ScoredCandidate {
                action: Action::discard(indices),
                expected_value: ev,
                variance_proxy: variance,
                rule: "discard_low_retention",
                detail,
            });
        }
    }

    let p_remaining = view.p_remaining;
    out.sort_by(|a, b| better(a, b, p_remaining));
    out
}

/// Single-step recommendation for the given public view; `None` once the
/// game is terminal.
pub fn ai_hint(view: &PublicView) -> Option<Hint> {
    let ranked = rank_candidates(view);
    ranked.into_iter().next().map(|c| Hint {
        params: json!({
            "rule": c.rule,
            "expected_value": c.expected_value,
            "detail": c.detail,
        }),
        action: c.action,
        explanation_key: AI_REASON_HEURISTIC.to_string(),
    })
}
