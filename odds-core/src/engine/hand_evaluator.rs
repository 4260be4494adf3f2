use std::cmp::Ordering;

use heapless;
use itertools::Itertools;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::engine::cards::{Card, CardView, Deck, Hand, HandRank, Suit};
use crate::engine::cardset::CardSet;
use crate::engine::combinations::Combinations;

/// The strongest five-card hand found in a set of cards.
///
/// Ordering (and equality) only look at strength: `rank` first, then the
/// `tiebreak` values left to right. Two hands built from different cards can
/// therefore compare equal, which is exactly a split pot.
#[derive(Clone, Debug)]
pub struct EvaluatedHand {
    pub rank: HandRank,
    pub tiebreak: heapless::Vec<u8, 5>,
    pub best: Hand,
}

impl PartialEq for EvaluatedHand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvaluatedHand {}

impl PartialOrd for EvaluatedHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvaluatedHand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.tiebreak.as_slice().cmp(other.tiebreak.as_slice()))
    }
}

/// Compares two evaluated hands: `Greater` means `a` wins.
pub fn compare(a: &EvaluatedHand, b: &EvaluatedHand) -> Ordering {
    a.cmp(b)
}

/// Best hand out of 1 to 7 cards. See [`HandEvaluator::find_best_poker_hand`].
pub fn evaluate(cards: impl CardView) -> Option<EvaluatedHand> {
    HandEvaluator::find_best_poker_hand(cards)
}

#[derive(Debug)]
pub struct HandEvaluator {
    sorted: [Card; 5],
    values: [u8; 5],
    cardset: CardSet,
}

impl HandEvaluator {
    fn new(cards: [Card; 5]) -> Self {
        let mut sorted = cards;
        sorted.sort_by(|a, b| b.rank.cmp(&a.rank).then(b.suit.cmp(&a.suit)));

        let values = sorted.map(|card| card.rank.value());
        let cardset = CardSet::from(sorted);

        Self {
            sorted,
            values,
            cardset,
        }
    }

    fn is_flush(&self) -> bool {
        Suit::iter().any(|suit| self.cardset.count_in_suit(suit) == 5)
    }

    /// Tiebreak of the straight in this hand, if there is one. The wheel
    /// counts its ace as a one.
    fn evaluate_run(&self) -> Option<heapless::Vec<u8, 5>> {
        let mut distinct: heapless::Vec<u8, 6> = self.values.iter().copied().dedup().collect();
        if distinct.first() == Some(&14) {
            // Capacity is 6 so the low ace always fits.
            let _ = distinct.push(1);
        }

        distinct
            .windows(5)
            .find(|window| window.iter().tuple_windows().all(|(high, low)| high - 1 == *low))
            .map(|window| window.iter().copied().collect())
    }

    /// Rank values grouped by multiplicity: biggest group first, higher
    /// value first among groups of the same size.
    fn rank_groups(&self) -> heapless::Vec<(usize, u8), 5> {
        let mut groups: heapless::Vec<(usize, u8), 5> =
            self.values.iter().copied().dedup_with_count().collect();
        groups.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        groups
    }

    fn evaluate(&self) -> EvaluatedHand {
        let flush = self.is_flush();
        let straight = self.evaluate_run();
        let groups = self.rank_groups();
        let grouped_values = || -> heapless::Vec<u8, 5> { groups.iter().map(|(_, value)| *value).collect() };

        let (rank, tiebreak) = match (straight, flush) {
            // 1. ROYAL FLUSH / STRAIGHT FLUSH
            (Some(run), true) => {
                let rank = if run.first() == Some(&14) && run.last() == Some(&10) {
                    HandRank::RoyalFlush
                } else {
                    HandRank::StraightFlush
                };
                (rank, run)
            }
            // 2. FOUR OF A KIND
            _ if groups[0].0 == 4 => (HandRank::FourOfAKind, grouped_values()),
            // 3. FULL HOUSE
            _ if groups[0].0 == 3 && groups[1].0 == 2 => (HandRank::FullHouse, grouped_values()),
            // 4. FLUSH
            (_, true) => (HandRank::Flush, self.values.iter().copied().collect()),
            // 5. STRAIGHT
            (Some(run), false) => (HandRank::Straight, run),
            // 6. THREE OF A KIND
            _ if groups[0].0 == 3 => (HandRank::ThreeOfAKind, grouped_values()),
            // 7. TWO PAIR
            _ if groups[0].0 == 2 && groups[1].0 == 2 => (HandRank::TwoPair, grouped_values()),
            // 8. PAIR
            _ if groups[0].0 == 2 => (HandRank::Pair, grouped_values()),
            // 9. HIGH CARD
            _ => (HandRank::HighCard, self.values.iter().copied().collect()),
        };

        EvaluatedHand {
            rank,
            tiebreak,
            best: Hand::from(self.sorted),
        }
    }

    /// Rank exactly five cards.
    pub fn evaluate_poker_hand(cards: [Card; 5]) -> EvaluatedHand {
        Self::new(cards).evaluate()
    }

    /// Rank the best five-card hand among 1 to 7 distinct cards.
    ///
    /// With fewer than five cards the input is padded with the lowest
    /// remaining cards of the canonical deck. That gives a provisional hand
    /// to display and nothing more: its rank is not a prediction.
    ///
    /// Returns `None` for an empty input or more than seven cards.
    pub fn find_best_poker_hand(card_view: impl CardView) -> Option<EvaluatedHand> {
        let cards = card_view.view();
        if cards.is_empty() || cards.len() > 7 {
            return None;
        }

        let mut pool: heapless::Vec<Card, 7> = cards.iter().copied().collect();
        if pool.len() < 5 {
            let missing = 5 - pool.len();
            trace!(missing, "padding partial hand");
            if let Some(padding) = Deck::remaining(cards).draw_n(missing) {
                pool.extend(padding.view().iter().copied());
            }
        }

        Combinations::<5>::new(pool.len())
            .map(|indices| Self::evaluate_poker_hand(indices.map(|i| pool[i])))
            .max()
    }
}
