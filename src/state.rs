use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, DECK_SIZE};
use crate::errors::EngineError;
use crate::events::Event;
use crate::infoset::PrivilegedContext;
use crate::manifest::SeedManifest;
use crate::rng::shuffled_deck;
use crate::types::{Action, Mode, Tier};

pub const HAND_SIZE: usize = 7;
pub const PLAY_SIZE: usize = 5;
pub const INITIAL_PLAYS: u8 = 4;
pub const INITIAL_DISCARDS: u8 = 10;

/// Authoritative game state. The ordered remaining deck is the single
/// source of truth and is private: every public observation goes through
/// the `public_view` projection, which drops order. Calibration reads the
/// ordered deck through `PrivilegedContext`-gated accessors only.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) hand: Vec<Card>,
    /// Remaining deck suffix; the front is the next draw.
    pub(crate) deck: Vec<Card>,
    pub(crate) p_remaining: u8,
    pub(crate) d_remaining: u8,
    pub(crate) score_total: u64,
    pub(crate) history: Vec<Action>,
    pub(crate) mode: Mode,
    pub(crate) target_score: Option<u64>,
}

impl GameState {
    /// Start a new game from a seed: shuffle, deal 7, budgets at 4/10.
    /// Deterministic: same seed, same hand and deck, every time.
    pub fn from_seed(seed: u64, mode: Mode, target_score: Option<u64>) -> (GameState, Vec<Event>) {
        let deck = shuffled_deck(seed);
        let hand = deck[..HAND_SIZE].to_vec();
        let deck = deck[HAND_SIZE..].to_vec();
        let state = GameState {
            hand,
            deck,
            p_remaining: INITIAL_PLAYS,
            d_remaining: INITIAL_DISCARDS,
            score_total: 0,
            history: Vec::new(),
            mode,
            target_score,
        };
        state.check_invariants();
        (state, vec![Event::game_started(seed)])
    }

    /// Construct a state from explicit hand and deck contents with fresh
    /// budgets. Intended for crafted scenarios and tests; validates hand
    /// size and card distinctness.
    pub fn with_setup(
        hand: Vec<Card>,
        deck: Vec<Card>,
        mode: Mode,
        target_score: Option<u64>,
    ) -> Result<GameState, String> {
        if hand.len() != HAND_SIZE {
            return Err(format!("hand must hold {HAND_SIZE} cards, got {}", hand.len()));
        }
        if hand.len() + deck.len() > DECK_SIZE {
            return Err(format!(
                "hand + deck exceed {DECK_SIZE} cards ({} given)",
                hand.len() + deck.len()
            ));
        }
        let mut seen = [false; DECK_SIZE];
        for c in hand.iter().chain(deck.iter()) {
            let i = c.index() as usize;
            if std::mem::replace(&mut seen[i], true) {
                return Err(format!("duplicate card {c} across hand and deck"));
            }
        }
        Ok(GameState {
            hand,
            deck,
            p_remaining: INITIAL_PLAYS,
            d_remaining: INITIAL_DISCARDS,
            score_total: 0,
            history: Vec::new(),
            mode,
            target_score,
        })
    }

    #[inline]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[inline]
    pub fn p_remaining(&self) -> u8 {
        self.p_remaining
    }

    #[inline]
    pub fn d_remaining(&self) -> u8 {
        self.d_remaining
    }

    #[inline]
    pub fn score_total(&self) -> u64 {
        self.score_total
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn target_score(&self) -> Option<u64> {
        self.target_score
    }

    #[inline]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// `len(history)` after the latest operation; monotonic within a
    /// session except across jumps.
    #[inline]
    pub fn step_index(&self) -> usize {
        self.history.len()
    }

    /// Terminal once the play budget is spent; no further PLAY/DISCARD.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.p_remaining == 0
    }

    #[inline]
    pub fn deck_remaining_count(&self) -> usize {
        self.deck.len()
    }

    /// Unordered multiset of the remaining deck. `Card`'s `Ord` is the
    /// canonical deck order, so iteration (and JSON serialization) of this
    /// map is canonical regardless of the hidden draw order. Only nonzero
    /// entries are present.
    pub fn deck_remaining_counts(&self) -> BTreeMap<Card, u8> {
        let mut counts: BTreeMap<Card, u8> = BTreeMap::new();
        for c in &self.deck {
            *counts.entry(*c).or_insert(0) += 1;
        }
        counts
    }

    /// The order-unknown projection: everything the player (and the
    /// heuristic policy) may observe. Draw order appears nowhere.
    pub fn public_view(&self) -> PublicView {
        PublicView {
            hand: self.hand.clone(),
            p_remaining: self.p_remaining,
            d_remaining: self.d_remaining,
            score_total: self.score_total,
            deck_remaining_count: self.deck.len(),
            deck_remaining_counts: self.deck_remaining_counts(),
        }
    }

    /// Ordered remaining deck; calibration only.
    #[inline]
    pub fn ordered_deck(&self, _ctx: &PrivilegedContext) -> &[Card] {
        &self.deck
    }

    /// Permute the remaining deck in place; calibration only. Used by the
    /// rollout evaluator to realize alternative draw orders consistent
    /// with the public multiset.
    pub fn shuffle_remaining_deck<R: Rng>(&mut self, _ctx: &PrivilegedContext, rng: &mut R) {
        self.deck.shuffle(rng);
    }

    /// Card-mass and hand-size invariants; cheap enough to check after
    /// every transition in debug builds.
    pub(crate) fn check_invariants(&self) {
        debug_assert_eq!(self.hand.len(), HAND_SIZE);
        debug_assert!(self.d_remaining <= INITIAL_DISCARDS);
        debug_assert!(self.p_remaining <= INITIAL_PLAYS);
        let plays_used = (INITIAL_PLAYS - self.p_remaining) as usize;
        let discards_used = (INITIAL_DISCARDS - self.d_remaining) as usize;
        debug_assert_eq!(
            self.hand.len() + self.deck.len() + plays_used * PLAY_SIZE + discards_used,
            DECK_SIZE,
            "card mass conservation violated"
        );
        debug_assert!(
            {
                let mut seen = [false; DECK_SIZE];
                self.hand
                    .iter()
                    .chain(self.deck.iter())
                    .all(|c| !std::mem::replace(&mut seen[c.index() as usize], true))
            },
            "duplicate card across hand and deck"
        );
    }
}

/// Public state shape at every step boundary, serialization-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicView {
    pub hand: Vec<Card>,
    pub p_remaining: u8,
    pub d_remaining: u8,
    pub score_total: u64,
    pub deck_remaining_count: usize,
    pub deck_remaining_counts: BTreeMap<Card, u8>,
}

/// Start a game resolving the seed pool and challenge target from the
/// manifest. An omitted seed is sampled uniformly from the pool.
pub fn start_from_manifest<R: Rng>(
    manifest: &SeedManifest,
    mode: Mode,
    tier: Tier,
    seed: Option<u64>,
    rng: &mut R,
) -> Result<(GameState, Vec<Event>), EngineError> {
    let seed = match seed {
        Some(s) => s,
        None => manifest.sample_seed(mode, tier, rng)?,
    };
    let target_score = match mode {
        Mode::Practice => None,
        Mode::Challenge => manifest.target_score(mode, tier)?,
    };
    Ok(GameState::from_seed(seed, mode, target_score))
}
