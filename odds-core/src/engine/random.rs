use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};

use crate::engine::cards::Card;

/// Where the simulator gets its randomness from: one permutation of the
/// remaining deck per trial.
pub trait RandomSource {
    fn permute(&mut self, cards: &mut [Card]);
}

/// Uniform Fisher-Yates shuffles driven by any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn permute(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.rng);
    }
}

/// A source that deals a fixed sequence of cards for each call, so tests
/// can pin down exactly what every trial sees.
///
/// Each script lists cards in dealing order; they are moved to the front of
/// the deck and the rest keep their relative order. Scripted cards that are
/// not in the deck are skipped. Once the scripts run out the deck is left
/// untouched.
///
/// ```
/// # use odds_core::prelude::{Card, RandomSource, ScriptedDeals};
/// let mut cards = vec![Card::from_ident("2S"), Card::from_ident("3S"), Card::from_ident("4S")];
/// let mut source = ScriptedDeals::new([vec![Card::from_ident("4S")]]);
/// source.permute(&mut cards);
/// assert_eq!(cards[0], Card::from_ident("4S"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedDeals {
    scripts: VecDeque<Vec<Card>>,
}

impl ScriptedDeals {
    pub fn new(scripts: impl IntoIterator<Item = Vec<Card>>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
        }
    }

    /// Uses the same script for every one of `trials` calls.
    pub fn repeat(script: &[Card], trials: usize) -> Self {
        Self::new(std::iter::repeat_with(|| script.to_vec()).take(trials))
    }

    pub fn remaining(&self) -> usize {
        self.scripts.len()
    }
}

impl RandomSource for ScriptedDeals {
    fn permute(&mut self, cards: &mut [Card]) {
        let Some(script) = self.scripts.pop_front() else {
            return;
        };

        let mut front = 0;
        for card in script {
            if let Some(offset) = cards[front..].iter().position(|c| *c == card) {
                cards[front..=front + offset].rotate_right(1);
                front += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::engine::cards::{CardView, Deck};
    use crate::{card, cards};

    #[test]
    fn rng_source_is_a_permutation_test() {
        let mut source = RngSource::new(SmallRng::seed_from_u64(42));
        let mut deck = Deck::base_deck();
        deck.shuffle(&mut source);
        let seen: HashSet<_> = deck.view().iter().copied().collect();
        assert_eq!(seen.len(), 52);
        assert_ne!(deck.view(), Deck::base_deck().view());
    }

    #[test]
    fn seeded_sources_agree_test() {
        let mut a = Deck::base_deck();
        let mut b = Deck::base_deck();
        a.shuffle(&mut RngSource::new(SmallRng::seed_from_u64(9)));
        b.shuffle(&mut RngSource::new(SmallRng::seed_from_u64(9)));
        assert_eq!(a.view(), b.view());
    }

    #[test]
    fn scripted_cards_come_first_test() {
        let mut deck = cards!("2S 3S 4S 5S 6S").view().to_vec();
        let mut source = ScriptedDeals::new([cards!("5S 2S").view().to_vec()]);
        source.permute(&mut deck);
        assert_eq!(deck, cards!("5S 2S 3S 4S 6S").view());
        assert_eq!(source.remaining(), 0);

        // Exhausted: nothing moves.
        source.permute(&mut deck);
        assert_eq!(deck, cards!("5S 2S 3S 4S 6S").view());
    }

    #[test]
    fn missing_scripted_cards_are_skipped_test() {
        let mut deck = cards!("2S 3S 4S").view().to_vec();
        let mut source = ScriptedDeals::new([vec![card!("AH"), card!("4S")]]);
        source.permute(&mut deck);
        assert_eq!(deck, cards!("4S 2S 3S").view());
    }

    #[test]
    fn repeat_test() {
        let source = ScriptedDeals::repeat(&[card!("AH")], 3);
        assert_eq!(source.remaining(), 3);
    }

    #[test]
    fn uniformity_smoke_test() {
        // Each of 3 cards should land on top roughly a third of the time.
        let mut source = RngSource::new(SmallRng::seed_from_u64(1));
        let mut tops = [0_usize; 3];
        let base = cards!("2S 3S 4S");
        for _ in 0..3000 {
            let mut deck = base.view().to_vec();
            source.permute(&mut deck);
            let index = base.view().iter().position(|c| *c == deck[0]).unwrap();
            tops[index] += 1;
        }
        assert!(tops.iter().all(|&count| (800..1200).contains(&count)), "{tops:?}");
    }
}
