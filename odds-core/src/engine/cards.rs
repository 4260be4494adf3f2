use std::fmt;
use std::str::FromStr;

use heapless;
use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter};

use crate::engine::{
    cardset::CardSet,
    error::{Error, Result},
    random::RandomSource,
};

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum Suit {
    Spades = 0,
    Clubs = 1,
    Hearts = 2,
    Diamonds = 3,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Self::Spades => '♠',
            Self::Clubs => '♣',
            Self::Hearts => '♥',
            Self::Diamonds => '♦',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' | '♠' => Some(Self::Spades),
            'C' | '♣' => Some(Self::Clubs),
            'H' | '♥' => Some(Self::Hearts),
            'D' | '♦' => Some(Self::Diamonds),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum Rank {
    Deuce = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    /// Numeric value used for ranking, 2 through 14 (aces high).
    pub fn value(self) -> u8 {
        self as u8 + 2
    }

    fn from_token(token: &str) -> Option<Self> {
        let rank = match token.to_ascii_uppercase().as_str() {
            "2" => Self::Deuce,
            "3" => Self::Three,
            "4" => Self::Four,
            "5" => Self::Five,
            "6" => Self::Six,
            "7" => Self::Seven,
            "8" => Self::Eight,
            "9" => Self::Nine,
            "T" | "10" => Self::Ten,
            "J" => Self::Jack,
            "Q" => Self::Queen,
            "K" => Self::King,
            "A" => Self::Ace,
            _ => return None,
        };
        Some(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ten => f.write_str("10"),
            Self::Jack => f.write_str("J"),
            Self::Queen => f.write_str("Q"),
            Self::King => f.write_str("K"),
            Self::Ace => f.write_str("A"),
            _ => write!(f, "{}", self.value()),
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Convert a shorthand identifier into a card. Panics if the identifier
    /// is incorrect. This exists only for test-writing.
    ///
    /// ```
    /// # use odds_core::prelude::{Card, Suit, Rank};
    /// let a = Card::from_ident("KH");
    /// let b = Card {
    ///     rank: Rank::King,
    ///     suit: Suit::Hearts,
    /// };
    /// assert_eq!(a, b);
    /// ```
    pub fn from_ident(ident: &str) -> Self {
        ident
            .parse()
            .unwrap_or_else(|err| panic!("bad card ident {ident:?}: {err}"))
    }
}

impl FromStr for Card {
    type Err = Error;

    /// Parses tokens such as `As`, `td`, `10h` or `Q♣`.
    fn from_str(token: &str) -> Result<Self> {
        let invalid = || Error::InvalidCard(token.to_owned());

        let trimmed = token.trim();
        let suit_char = trimmed.chars().last().ok_or_else(invalid)?;
        let rank_token = &trimmed[..trimmed.len() - suit_char.len_utf8()];

        let suit = Suit::from_char(suit_char).ok_or_else(invalid)?;
        let rank = Rank::from_token(rank_token).ok_or_else(invalid)?;

        Ok(Self { rank, suit })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

#[macro_export]
macro_rules! card {
    ($ident:literal) => {
        $crate::engine::cards::Card::from_ident($ident)
    };
}

pub trait CardView {
    fn view(&self) -> &[Card];
}

impl CardView for [Card] {
    fn view(&self) -> &[Card] {
        self
    }
}

impl<const N: usize> CardView for [Card; N] {
    fn view(&self) -> &[Card] {
        self
    }
}

impl CardView for Vec<Card> {
    fn view(&self) -> &[Card] {
        self
    }
}

impl<V: CardView + ?Sized> CardView for &V {
    fn view(&self) -> &[Card] {
        (**self).view()
    }
}

/// An ordered pile of cards. Cards are dealt from the front.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

lazy_static! {
    static ref BASE_DECK_CARDS: Vec<Card> = {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card { rank, suit });
            }
        }
        cards
    };
}

impl Deck {
    /// All 52 cards in canonical order: suit by suit, deuce to ace.
    pub fn base_deck() -> Self {
        Self {
            cards: BASE_DECK_CARDS.clone(),
        }
    }

    /// The base deck minus every card in `known`, canonical order preserved.
    pub fn remaining(known: impl CardView) -> Self {
        let mut unseen = CardSet::full();
        for card in known.view() {
            unseen.remove(*card);
        }
        Self {
            cards: BASE_DECK_CARDS
                .iter()
                .copied()
                .filter(|card| unseen.contains(*card))
                .collect(),
        }
    }

    pub fn shuffle(&mut self, source: &mut impl RandomSource) {
        source.permute(&mut self.cards);
    }

    pub fn draw_n(&mut self, n: usize) -> Option<CardCollection> {
        if self.count() < n {
            None
        } else {
            Some(CardCollection {
                cards: self.cards.drain(..n).collect(),
            })
        }
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

impl CardView for Deck {
    fn view(&self) -> &[Card] {
        &self.cards
    }
}

/// The five cards making up an evaluated hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    pub(crate) cards: heapless::Vec<Card, 5>,
}

impl From<[Card; 5]> for Hand {
    fn from(value: [Card; 5]) -> Self {
        Self {
            cards: value.into_iter().collect(),
        }
    }
}

impl CardView for Hand {
    fn view(&self) -> &[Card] {
        &self.cards
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardCollection {
    cards: Vec<Card>,
}

impl CardCollection {
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }
    /// Convert a series of shorthand identifiers into a `CardCollection`.
    /// Panics if the input is incorrect. This exists only for test-writing.
    ///
    /// ```
    /// # use odds_core::prelude::{Suit, Rank, Card, CardCollection};
    /// let cards = CardCollection::from_idents("KH TD JS 2C");
    /// assert_eq!(cards.nth(2), Some(Card {
    ///     rank: Rank::Jack,
    ///     suit: Suit::Spades,
    /// }));
    /// ```
    pub fn from_idents(idents: &str) -> Self {
        idents
            .split_ascii_whitespace()
            .map(Card::from_ident)
            .collect()
    }
    /// Parse whitespace or comma separated card tokens.
    pub fn parse(tokens: &str) -> Result<Self> {
        tokens
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    }
    pub fn nth(&self, n: usize) -> Option<Card> {
        self.cards.get(n).copied()
    }
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }
}

#[macro_export]
macro_rules! cards {
    ($ident:literal) => {
        $crate::engine::cards::CardCollection::from_idents($ident)
    };
}

impl From<&[Card]> for CardCollection {
    fn from(value: &[Card]) -> Self {
        Self {
            cards: Vec::from(value),
        }
    }
}

impl std::iter::FromIterator<Card> for CardCollection {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl Extend<Card> for CardCollection {
    fn extend<T: IntoIterator<Item = Card>>(&mut self, iter: T) {
        self.cards.extend(iter);
    }
}

impl CardView for CardCollection {
    fn view(&self) -> &[Card] {
        &self.cards
    }
}

impl fmt::Display for CardCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

/// Poker hand categories, weakest first.
#[derive(Copy, Clone, Debug, Hash, PartialOrd, Ord, PartialEq, Eq, EnumIter, EnumCount)]
#[repr(u8)]
pub enum HandRank {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl HandRank {
    /// Numeric strength of the category, 1 (high card) through 10 (royal flush).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based position, suitable for indexing per-category tables.
    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::Pair => "One Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
            Self::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::SmallRng, SeedableRng};
    use strum::EnumCount;

    use super::*;
    use crate::engine::random::RngSource;

    #[test]
    fn base_deck_test() {
        let mut seen = HashSet::new();
        let deck = Deck::base_deck();
        for card in deck.cards {
            seen.insert(card);
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn remaining_deck_test() {
        let known = cards!("AS AH KD 7C 2S");
        let deck = Deck::remaining(&known);
        assert_eq!(deck.count(), 47);
        for card in known.view() {
            assert!(!deck.view().contains(card));
        }
        // Canonical order survives the subtraction.
        assert_eq!(deck.view()[0], card!("3S"));
    }

    #[test]
    fn base_shuffle_test() {
        let mut seen = HashSet::new();
        let mut source = RngSource::new(SmallRng::from_entropy());
        let mut deck = Deck::base_deck();
        deck.shuffle(&mut source);
        for card in deck.cards {
            seen.insert(card);
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn deck_draw_test() {
        let mut seen = HashSet::new();
        let mut source = RngSource::new(SmallRng::seed_from_u64(7));
        let mut deck = Deck::base_deck();
        deck.shuffle(&mut source);
        let hole = deck.draw_n(2).unwrap();
        assert_eq!(hole.len(), 2);
        seen.extend(hole.view().iter().copied());
        let rest = deck.draw_n(50).unwrap();
        seen.extend(rest.view().iter().copied());
        assert_eq!(seen.len(), 52);
        assert_eq!(deck.count(), 0);
        assert_eq!(deck.draw_n(1), None);
        assert_eq!(deck.draw_n(0), Some(CardCollection::empty()));
    }

    #[test]
    fn parse_card_test() {
        assert_eq!("As".parse::<Card>().unwrap(), card!("AS"));
        assert_eq!("10h".parse::<Card>().unwrap(), card!("TH"));
        assert_eq!("q♣".parse::<Card>().unwrap(), card!("QC"));
        assert!(matches!("1s".parse::<Card>(), Err(Error::InvalidCard(_))));
        assert!(matches!("Kx".parse::<Card>(), Err(Error::InvalidCard(_))));
        assert!(matches!("".parse::<Card>(), Err(Error::InvalidCard(_))));
        assert!(matches!("♠".parse::<Card>(), Err(Error::InvalidCard(_))));
    }

    #[test]
    fn display_test() {
        assert_eq!(card!("TH").to_string(), "10♥");
        assert_eq!(cards!("AS 9D").to_string(), "A♠ 9♦");
        assert_eq!(HandRank::RoyalFlush.to_string(), "Royal Flush");
    }

    #[test]
    fn hand_rank_order_test() {
        let ranks: Vec<_> = HandRank::iter().collect();
        assert_eq!(ranks.len(), HandRank::COUNT);
        assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(HandRank::HighCard.value(), 1);
        assert_eq!(HandRank::RoyalFlush.value(), 10);
        assert_eq!(HandRank::RoyalFlush.index(), HandRank::COUNT - 1);
    }
}
