use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tracing::trace;

use crate::engine::cards::HandRank;
use crate::engine::error::Result;
use crate::engine::simulator::{SimulationConfig, SimulationResult, Simulator};
use crate::engine::situation::Situation;

/// Smallest change of an opponent category, in percentage points, worth
/// reporting between two stages.
const SHIFT_THRESHOLD: f64 = 0.1;

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
pub enum Stage {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Stage {
    /// Board cards showing at this stage.
    pub fn board_len(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preflop => "Preflop",
            Self::Flop => "Flop",
            Self::Turn => "Turn",
            Self::River => "River",
        };
        f.write_str(name)
    }
}

/// Movement of an opponent category between consecutive stages.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shift {
    Up(f64),
    Down(f64),
}

impl Shift {
    /// `None` when there was nothing before to compare against or the move
    /// is below [`SHIFT_THRESHOLD`].
    pub fn between(before: f64, after: f64) -> Option<Self> {
        if before == 0.0 {
            return None;
        }
        let diff = after - before;
        if diff.abs() < SHIFT_THRESHOLD {
            None
        } else if diff > 0.0 {
            Some(Self::Up(diff))
        } else {
            Some(Self::Down(-diff))
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up(diff) => write!(f, "▲{diff:.2}%"),
            Self::Down(diff) => write!(f, "▼{diff:.2}%"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageReport {
    stages: Vec<(Stage, SimulationResult)>,
}

impl StageReport {
    pub fn get(&self, stage: Stage) -> Option<&SimulationResult> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, &SimulationResult)> {
        self.stages.iter().map(|(stage, result)| (*stage, result))
    }

    /// How the share of opponents holding `rank` moved from the previous
    /// simulated stage to `stage`.
    pub fn shift(&self, stage: Stage, rank: HandRank) -> Option<Shift> {
        let position = self.stages.iter().position(|(s, _)| *s == stage)?;
        let (_, previous) = self.stages.get(position.checked_sub(1)?)?;
        let (_, current) = &self.stages[position];
        Shift::between(previous.opponent_prob(rank), current.opponent_prob(rank))
    }
}

/// Simulates every stage the known board reaches: preflop always, then the
/// flop, turn and river as their cards are known. `on_stage` is told about
/// each stage before its trials start.
pub fn simulate_stages(
    situation: &Situation,
    config: SimulationConfig,
    mut on_stage: impl FnMut(Stage),
) -> Result<StageReport> {
    config.validate()?;

    let mut stages = Vec::new();
    for stage in Stage::iter().filter(|stage| stage.board_len() <= situation.board().len()) {
        on_stage(stage);
        trace!(%stage, "simulating stage");

        let partial = situation.with_board_prefix(stage.board_len());
        let result = Simulator::new(&partial, config)?.run_parallel();
        stages.push((stage, result));
    }

    Ok(StageReport { stages })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::engine::error::Error;

    #[test]
    fn shift_threshold_test() {
        assert_eq!(Shift::between(0.0, 5.0), None);
        assert_eq!(Shift::between(10.0, 10.05), None);
        assert_eq!(Shift::between(10.0, 9.95), None);
        assert!(matches!(Shift::between(10.0, 12.5), Some(Shift::Up(diff)) if (diff - 2.5).abs() < 1e-9));
        assert!(matches!(Shift::between(10.0, 7.0), Some(Shift::Down(diff)) if (diff - 3.0).abs() < 1e-9));
        assert_eq!(Shift::Up(1.234).to_string(), "▲1.23%");
    }

    #[test]
    fn stages_follow_board_test() {
        let config = SimulationConfig::default().with_trials(300).with_seed(4);

        let mut seen = Vec::new();
        let situation = Situation::parse("As Ah", "Kd 7c 2s 9h").unwrap();
        let report = simulate_stages(&situation, config, |stage| seen.push(stage)).unwrap();

        assert_eq!(seen, vec![Stage::Preflop, Stage::Flop, Stage::Turn]);
        assert!(report.get(Stage::River).is_none());
        for (stage, result) in report.iter() {
            assert_eq!(result.trials, 300, "{stage}");
            assert_abs_diff_eq!(
                result.win_rate + result.tie_rate + result.loss_rate,
                100.0,
                epsilon = 0.01
            );
        }

        let preflop = simulate_stages(&Situation::parse("As Ah", "").unwrap(), config, |_| {})
            .unwrap();
        assert_eq!(preflop.iter().count(), 1);
    }

    #[test]
    fn shift_uses_previous_stage_test() {
        let config = SimulationConfig::default().with_trials(2_000).with_seed(9);
        let situation = Situation::parse("7c 8c", "Kh Kd Ks 2c 2d").unwrap();
        let report = simulate_stages(&situation, config, |_| {}).unwrap();

        assert_eq!(report.shift(Stage::Preflop, HandRank::FullHouse), None);
        // Trip kings on the flop make full houses far likelier than preflop,
        // and the paired river pushes every opponent to at least a boat.
        assert!(matches!(
            report.shift(Stage::Flop, HandRank::FullHouse),
            Some(Shift::Up(_))
        ));
        let river = report.get(Stage::River).unwrap();
        assert_abs_diff_eq!(river.opponent_prob(HandRank::HighCard), 0.0);
        assert_abs_diff_eq!(river.opponent_prob(HandRank::Pair), 0.0);
    }

    #[test]
    fn invalid_config_test() {
        let situation = Situation::parse("As Ah", "").unwrap();
        let mut calls = 0;
        let result = simulate_stages(
            &situation,
            SimulationConfig::default().with_players(0),
            |_| calls += 1,
        );
        assert_eq!(result, Err(Error::PlayerCount(0)));
        assert_eq!(calls, 0);
    }
}
