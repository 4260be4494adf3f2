//! Hold'em odds engine: hand ranking, exact outs and Monte Carlo equity.
//!
//! Everything is recomputed per call; nothing in this crate holds state
//! between invocations.

pub mod engine;
pub mod prelude;
