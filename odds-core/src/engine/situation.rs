use heapless;

use crate::engine::cards::{Card, CardCollection, CardView};
use crate::engine::cardset::CardSet;
use crate::engine::error::{Error, Result};
use crate::engine::hand_evaluator::{evaluate, EvaluatedHand};

/// A validated set of known cards: two hole cards plus up to five board
/// cards, none repeated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Situation {
    hand: [Card; 2],
    board: heapless::Vec<Card, 5>,
}

impl Situation {
    pub fn new(hand: &[Card], board: &[Card]) -> Result<Self> {
        let hand: [Card; 2] = hand.try_into().map_err(|_| Error::HandSize(hand.len()))?;
        let board: heapless::Vec<Card, 5> =
            heapless::Vec::from_slice(board).map_err(|()| Error::OverfullBoard(board.len()))?;

        let mut seen = CardSet::empty();
        for card in hand.iter().chain(board.iter()) {
            if !seen.insert(*card) {
                return Err(Error::DuplicateCard(*card));
            }
        }

        Ok(Self { hand, board })
    }

    /// Parse hole cards and board from card tokens, e.g. `"As Ah"` and
    /// `"Kd 7c 2s"`.
    pub fn parse(hand: &str, board: &str) -> Result<Self> {
        let hand = CardCollection::parse(hand)?;
        let board = CardCollection::parse(board)?;
        Self::new(hand.view(), board.view())
    }

    pub fn hand(&self) -> &[Card; 2] {
        &self.hand
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The same hole cards with only the first `len` board cards.
    pub fn with_board_prefix(&self, len: usize) -> Self {
        let len = len.min(self.board.len());
        Self {
            hand: self.hand,
            board: self.board.iter().copied().take(len).collect(),
        }
    }

    /// Hole cards followed by the board.
    pub fn known(&self) -> CardCollection {
        self.hand.iter().chain(self.board.iter()).copied().collect()
    }

    /// Best hand from everything known so far. Before the flop this is
    /// padded, so only the category is meaningful for display.
    pub fn current_hand(&self) -> Option<EvaluatedHand> {
        evaluate(self.known())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cards::HandRank;
    use crate::{card, cards};

    #[test]
    fn valid_situation_test() {
        let situation = Situation::parse("As Ah", "Kd 7c 2s").unwrap();
        assert_eq!(situation.hand(), &[card!("AS"), card!("AH")]);
        assert_eq!(situation.board(), cards!("KD 7C 2S").view());
        assert_eq!(situation.known().len(), 5);

        let preflop = Situation::parse("As Ah", "").unwrap();
        assert!(preflop.board().is_empty());
    }

    #[test]
    fn hand_size_test() {
        assert_eq!(Situation::parse("As", ""), Err(Error::HandSize(1)));
        assert_eq!(Situation::parse("As Ah Ad", ""), Err(Error::HandSize(3)));
    }

    #[test]
    fn overfull_board_test() {
        assert_eq!(
            Situation::parse("As Ah", "2c 3c 4c 5c 6c 7c"),
            Err(Error::OverfullBoard(6))
        );
    }

    #[test]
    fn duplicate_card_test() {
        assert_eq!(
            Situation::parse("As Ah", "Kd As 2s"),
            Err(Error::DuplicateCard(card!("AS")))
        );
        assert_eq!(
            Situation::parse("Qc Qc", ""),
            Err(Error::DuplicateCard(card!("QC")))
        );
    }

    #[test]
    fn invalid_card_test() {
        assert_eq!(
            Situation::parse("As 1h", ""),
            Err(Error::InvalidCard("1h".to_owned()))
        );
    }

    #[test]
    fn current_hand_test() {
        let situation = Situation::parse("As Ah", "Kd Kc 2s").unwrap();
        assert_eq!(situation.current_hand().unwrap().rank, HandRank::TwoPair);

        let preflop = Situation::parse("As Ah", "").unwrap();
        assert!(preflop.current_hand().unwrap().rank >= HandRank::Pair);
    }

    #[test]
    fn board_prefix_test() {
        let situation = Situation::parse("As Ah", "Kd 7c 2s 9h Jd").unwrap();
        assert_eq!(situation.with_board_prefix(3).board(), cards!("KD 7C 2S").view());
        assert_eq!(situation.with_board_prefix(9).board().len(), 5);
        assert!(situation.with_board_prefix(0).board().is_empty());
    }
}
