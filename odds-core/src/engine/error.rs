use thiserror::Error;

use crate::engine::cards::Card;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("`{0}` is not a card")]
    InvalidCard(String),
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("a hand must have exactly 2 cards, got {0}")]
    HandSize(usize),
    #[error("a board can have a maximum of 5 cards, got {0}")]
    OverfullBoard(usize),
    #[error("at most 7 cards can be known, got {0}")]
    TooManyCards(usize),
    #[error("player count must be between 2 and {max}, got {0}", max = crate::engine::simulator::MAX_PLAYERS)]
    PlayerCount(usize),
    #[error("a simulation needs at least one trial")]
    NoTrials,
}

pub type Result<T> = std::result::Result<T, Error>;
