//! Exact improvement odds: which undealt cards lift the current hand into a
//! better category, and how likely at least one of them arrives.

use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, trace};

use crate::engine::cards::{Card, CardView, Deck, HandRank};
use crate::engine::cardset::CardSet;
use crate::engine::error::{Error, Result};
use crate::engine::hand_evaluator::evaluate;

/// Out cards for one hand category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryOuts {
    pub rank: HandRank,
    pub cards: Vec<Card>,
    pub probability: f64,
}

impl CategoryOuts {
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutsResult {
    /// Current category of the known cards, if there are enough of them to
    /// have one.
    pub current: Option<HandRank>,
    /// Nonempty out-sets, strongest category first.
    pub categories: Vec<CategoryOuts>,
    /// Chance of improving to any better category, from the union of all
    /// out-sets.
    pub any_improvement: f64,
    pub cards_to_come: usize,
    pub remaining_deck: usize,
}

impl OutsResult {
    fn empty(known: usize, remaining_deck: usize) -> Self {
        Self {
            current: None,
            categories: Vec::new(),
            any_improvement: 0.0,
            cards_to_come: 7_usize.saturating_sub(known),
            remaining_deck,
        }
    }

    pub fn category(&self, rank: HandRank) -> Option<&CategoryOuts> {
        self.categories.iter().find(|outs| outs.rank == rank)
    }

    pub fn total_outs(&self) -> usize {
        self.categories.iter().map(CategoryOuts::count).sum()
    }
}

/// Percent chance of drawing at least one of `outs` cards when
/// `cards_to_come` cards are dealt from a deck of `deck` cards.
///
/// Only one or two cards to come are solved; anything else is zero.
///
/// ```
/// # use odds_core::prelude::calc_prob_from_outs;
/// assert!((calc_prob_from_outs(9, 47, 1) - 19.15).abs() < 0.01);
/// assert!((calc_prob_from_outs(9, 47, 2) - 34.97).abs() < 0.01);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn calc_prob_from_outs(outs: usize, deck: usize, cards_to_come: usize) -> f64 {
    if outs == 0 || deck == 0 {
        return 0.0;
    }

    let outs = outs as f64;
    let deck = deck as f64;
    match cards_to_come {
        1 => outs / deck * 100.0,
        2 => (1.0 - ((deck - outs) / deck) * ((deck - 1.0 - outs) / (deck - 1.0))) * 100.0,
        _ => 0.0,
    }
}

/// Computes the outs of 2 to 6 known cards.
///
/// With fewer than five known cards the current hand would only be a padded
/// guess, so no out-sets are reported; with seven there is nothing to come.
/// Either way the result is empty rather than an error. Duplicates and more
/// than seven cards are refused.
pub fn compute_outs(known: impl CardView) -> Result<OutsResult> {
    let known = known.view();
    if known.len() > 7 {
        return Err(Error::TooManyCards(known.len()));
    }

    let mut seen = CardSet::empty();
    for card in known {
        if !seen.insert(*card) {
            return Err(Error::DuplicateCard(*card));
        }
    }

    let remaining = Deck::remaining(known);
    let cards_to_come = 7 - known.len();
    debug!(known = known.len(), cards_to_come, "computing outs");

    if known.len() < 5 || cards_to_come == 0 {
        let mut result = OutsResult::empty(known.len(), remaining.count());
        if known.len() >= 5 {
            result.current = evaluate(known).map(|hand| hand.rank);
        }
        return Ok(result);
    }

    let Some(baseline) = evaluate(known) else {
        return Ok(OutsResult::empty(known.len(), remaining.count()));
    };

    let mut out_sets = [CardSet::empty(); HandRank::COUNT];
    let mut with_draw = known.to_vec();
    for card in remaining.view() {
        with_draw.push(*card);
        if let Some(tentative) = evaluate(&with_draw) {
            if tentative.rank > baseline.rank {
                out_sets[tentative.rank.index()].insert(*card);
            }
        }
        with_draw.pop();
    }

    // A card belongs only to the strongest category it reaches.
    let mut claimed = CardSet::empty();
    let mut categories = Vec::new();
    for rank in HandRank::iter().rev() {
        let cards: Vec<Card> = remaining
            .view()
            .iter()
            .copied()
            .filter(|card| out_sets[rank.index()].contains(*card) && !claimed.contains(*card))
            .collect();
        if cards.is_empty() {
            continue;
        }

        for card in &cards {
            claimed.insert(*card);
        }
        let probability = calc_prob_from_outs(cards.len(), remaining.count(), cards_to_come);
        trace!(%rank, outs = cards.len(), probability, "out category");
        categories.push(CategoryOuts {
            rank,
            cards,
            probability,
        });
    }

    let any_improvement = calc_prob_from_outs(claimed.count(), remaining.count(), cards_to_come);
    debug!(
        current = %baseline.rank,
        outs = claimed.count(),
        any_improvement,
        "outs computed"
    );

    Ok(OutsResult {
        current: Some(baseline.rank),
        categories,
        any_improvement,
        cards_to_come,
        remaining_deck: remaining.count(),
    })
}
