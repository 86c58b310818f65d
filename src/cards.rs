use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Card ranks in canonical ascending order (2 lowest, Ace highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value used by the classifier: 2..=14 (Ace high).
    #[inline]
    pub fn value(self) -> u8 {
        self as u8 + 2
    }

    /// Position in the canonical rank ordering, 0..=12.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    #[inline]
    pub fn from_char(c: char) -> Option<Rank> {
        Some(match c {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        })
    }
}

/// Card suits in canonical order: S, H, D, C. The order never changes; the
/// counts-map serialization depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Position in the canonical suit ordering, 0..=3.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    #[inline]
    pub fn from_char(c: char) -> Option<Suit> {
        Some(match c {
            'S' => Suit::Spades,
            'H' => Suit::Hearts,
            'D' => Suit::Diamonds,
            'C' => Suit::Clubs,
            _ => return None,
        })
    }
}

pub const DECK_SIZE: usize = 52;

/// A playing card, stored as its compact index `0..52` where
/// `index = rank_index * 4 + suit_index`.
///
/// `Ord` on `Card` is exactly the canonical deck order (rank-major 2..A,
/// suit S,H,D,C), so a `BTreeMap<Card, _>` iterates and serializes its keys
/// in canonical order. At the boundary a card is the two-character `RS`
/// string (`"AS"`, `"7H"`); `Serialize`/`Deserialize` use that encoding,
/// including as JSON map keys.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    #[inline]
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card((rank.index() * 4 + suit.index()) as u8)
    }

    /// Construct from a compact index. Errors on anything outside `0..52`.
    #[inline]
    pub fn from_index(index: u8) -> Result<Card, String> {
        if (index as usize) < DECK_SIZE {
            Ok(Card(index))
        } else {
            Err(format!("Card index {index} out of range (0..{DECK_SIZE})"))
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 / 4) as usize]
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 % 4) as usize]
    }

    /// Classifier rank value, 2..=14.
    #[inline]
    pub fn rank_value(self) -> u8 {
        self.rank().value()
    }

    /// Parse a two-character `RS` string like `"AS"` or `"7H"`.
    pub fn from_rs(s: &str) -> Result<Card, String> {
        let mut chars = s.chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("Invalid card RS: {s:?} (expected 2 characters)"));
        };
        let rank = Rank::from_char(r).ok_or_else(|| format!("Invalid rank in card RS: {s:?}"))?;
        let suit = Suit::from_char(su).ok_or_else(|| format!("Invalid suit in card RS: {s:?}"))?;
        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::from_rs(s)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct CardVisitor;

impl Visitor<'_> for CardVisitor {
    type Value = Card;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a two-character RS card string like \"AS\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Card, E> {
        Card::from_rs(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Card, D::Error> {
        deserializer.deserialize_str(CardVisitor)
    }
}

/// The standard 52-card deck in canonical order: 2S, 2H, 2D, 2C, 3S, ... AC.
/// Stable and deterministic every time; the shuffle contract starts here.
#[inline]
pub fn standard_deck() -> [Card; DECK_SIZE] {
    let mut deck = [Card(0); DECK_SIZE];
    for (i, slot) in deck.iter_mut().enumerate() {
        *slot = Card(i as u8);
    }
    deck
}
