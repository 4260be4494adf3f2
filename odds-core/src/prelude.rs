pub use crate::engine::cards::{
    Card, CardCollection, CardView, Deck, Hand, HandRank, Rank, Suit,
};
pub use crate::engine::combinations::Combinations;
pub use crate::engine::error::{Error, Result};
pub use crate::engine::hand_evaluator::{compare, evaluate, EvaluatedHand, HandEvaluator};
pub use crate::engine::outs::{calc_prob_from_outs, compute_outs, CategoryOuts, OutsResult};
pub use crate::engine::random::{RandomSource, RngSource, ScriptedDeals};
pub use crate::engine::simulator::{
    simulate_equity, simulate_equity_parallel, SimulationConfig, SimulationResult, Simulator,
    DEFAULT_TRIALS, MAX_PLAYERS,
};
pub use crate::engine::situation::Situation;
pub use crate::engine::stages::{simulate_stages, Shift, Stage, StageReport};
