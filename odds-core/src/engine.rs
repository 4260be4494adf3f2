pub mod cards;
pub(crate) mod cardset;
pub mod combinations;
pub mod error;
pub mod hand_evaluator;
pub mod outs;
pub mod random;
pub mod simulator;
pub mod situation;
pub mod stages;
