//! Monte Carlo equity against uniformly random opponents.

use std::cmp::Ordering;

use heapless;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use crate::engine::cards::{Card, CardView, Deck, HandRank};
use crate::engine::error::{Error, Result};
use crate::engine::hand_evaluator::{compare, evaluate, EvaluatedHand};
use crate::engine::random::{RandomSource, RngSource};
use crate::engine::situation::Situation;

pub const DEFAULT_TRIALS: usize = 5_000;

/// Two hole cards per player plus a full board must fit in one deck.
pub const MAX_PLAYERS: usize = 23;

/// Trials handed to one parallel worker at a time.
const CHUNK_TRIALS: usize = 250;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub trials: usize,
    /// Players at the table, including us.
    pub player_count: usize,
    /// Seed for the parallel runner. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            player_count: 2,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_players(self, player_count: usize) -> Self {
        Self {
            player_count,
            ..self
        }
    }

    pub fn with_trials(self, trials: usize) -> Self {
        Self { trials, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(Error::PlayerCount(self.player_count));
        }
        if self.trials == 0 {
            return Err(Error::NoTrials);
        }
        Ok(())
    }
}

/// Raw counters from a batch of trials. Batches merge by addition.
#[derive(Clone, Debug, Default)]
struct Tally {
    trials: usize,
    wins: usize,
    ties: usize,
    losses: usize,
    opponent_categories: [usize; HandRank::COUNT],
}

impl Tally {
    fn merge(mut self, other: Self) -> Self {
        self.trials += other.trials;
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        for (mine, theirs) in self
            .opponent_categories
            .iter_mut()
            .zip(other.opponent_categories)
        {
            *mine += theirs;
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    pub win_rate: f64,
    pub tie_rate: f64,
    pub loss_rate: f64,
    opponent_probs: [f64; HandRank::COUNT],
    pub trials: usize,
    pub player_count: usize,
}

impl SimulationResult {
    #[allow(clippy::cast_precision_loss)]
    fn from_tally(tally: &Tally, player_count: usize) -> Self {
        let trials = tally.trials as f64;
        let opponent_hands = trials * (player_count - 1) as f64;
        let percent = |count: usize, total: f64| {
            if total > 0.0 {
                count as f64 / total * 100.0
            } else {
                0.0
            }
        };

        Self {
            win_rate: percent(tally.wins, trials),
            tie_rate: percent(tally.ties, trials),
            loss_rate: percent(tally.losses, trials),
            opponent_probs: tally
                .opponent_categories
                .map(|count| percent(count, opponent_hands)),
            trials: tally.trials,
            player_count,
        }
    }

    /// Percentage of opponent hands that finished in `rank`.
    pub fn opponent_prob(&self, rank: HandRank) -> f64 {
        self.opponent_probs[rank.index()]
    }

    /// Opponent category distribution, strongest category first.
    pub fn opponent_probs(&self) -> impl Iterator<Item = (HandRank, f64)> + '_ {
        HandRank::iter()
            .rev()
            .map(|rank| (rank, self.opponent_prob(rank)))
    }
}

/// Runs equity trials for one situation. Holds only the inputs; every run
/// starts from fresh counters.
#[derive(Clone, Debug)]
pub struct Simulator {
    situation: Situation,
    config: SimulationConfig,
    remaining: Deck,
}

impl Simulator {
    pub fn new(situation: &Situation, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            situation: situation.clone(),
            config,
            remaining: Deck::remaining(situation.known()),
        })
    }

    fn showdown(&self, hole: &[Card], runout: &[Card]) -> Option<EvaluatedHand> {
        let cards: heapless::Vec<Card, 7> = hole
            .iter()
            .chain(self.situation.board())
            .chain(runout)
            .copied()
            .collect();
        evaluate(cards.as_slice())
    }

    fn run_trial(&self, source: &mut impl RandomSource, tally: &mut Tally) {
        let mut deck = self.remaining.clone();
        deck.shuffle(source);

        // Opponents are dealt first, then the board is completed from what
        // is left, so nothing is ever dealt twice.
        let opponents = self.config.player_count - 1;
        let (holes, rest) = deck.view().split_at(2 * opponents);
        let runout = &rest[..5 - self.situation.board().len()];

        let Some(ours) = self.showdown(self.situation.hand(), runout) else {
            return;
        };

        let mut strongest: Option<EvaluatedHand> = None;
        for hole in holes.chunks_exact(2) {
            let Some(theirs) = self.showdown(hole, runout) else {
                continue;
            };
            tally.opponent_categories[theirs.rank.index()] += 1;
            if strongest.as_ref().map_or(true, |best| theirs > *best) {
                strongest = Some(theirs);
            }
        }

        tally.trials += 1;
        match strongest.map(|best| compare(&ours, &best)) {
            Some(Ordering::Less) => tally.losses += 1,
            Some(Ordering::Equal) => tally.ties += 1,
            Some(Ordering::Greater) | None => tally.wins += 1,
        }
    }

    fn run_trials(&self, trials: usize, source: &mut impl RandomSource) -> Tally {
        let mut tally = Tally::default();
        for _ in 0..trials {
            self.run_trial(source, &mut tally);
        }
        tally
    }

    /// Runs every trial on the calling thread, drawing from `source`.
    pub fn run(&self, source: &mut impl RandomSource) -> SimulationResult {
        debug!(
            trials = self.config.trials,
            players = self.config.player_count,
            board = self.situation.board().len(),
            "simulating equity"
        );
        let tally = self.run_trials(self.config.trials, source);
        self.finish(&tally)
    }

    /// Splits the trials into chunks on the rayon pool. Every chunk gets its
    /// own generator, seeded from a master seeded by the config, so a seeded
    /// run gives the same answer however the chunks are scheduled.
    pub fn run_parallel(&self) -> SimulationResult {
        let mut master = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let trials = self.config.trials;
        let chunks = trials.div_ceil(CHUNK_TRIALS);
        let seeds: Vec<u64> = (0..chunks).map(|_| master.gen()).collect();
        debug!(
            trials,
            chunks,
            players = self.config.player_count,
            board = self.situation.board().len(),
            "simulating equity in parallel"
        );

        let tally = seeds
            .into_par_iter()
            .enumerate()
            .map(|(chunk, seed)| {
                let count = CHUNK_TRIALS.min(trials - chunk * CHUNK_TRIALS);
                let mut source = RngSource::new(SmallRng::seed_from_u64(seed));
                self.run_trials(count, &mut source)
            })
            .reduce(Tally::default, Tally::merge);

        self.finish(&tally)
    }

    fn finish(&self, tally: &Tally) -> SimulationResult {
        let result = SimulationResult::from_tally(tally, self.config.player_count);
        debug!(
            win = result.win_rate,
            tie = result.tie_rate,
            loss = result.loss_rate,
            "simulation finished"
        );
        result
    }
}

/// Equity of `situation` against `player_count - 1` random opponents, with
/// every trial drawn from `source`.
pub fn simulate_equity(
    situation: &Situation,
    config: SimulationConfig,
    source: &mut impl RandomSource,
) -> Result<SimulationResult> {
    Ok(Simulator::new(situation, config)?.run(source))
}

/// Like [`simulate_equity`], spread over the rayon pool.
pub fn simulate_equity_parallel(
    situation: &Situation,
    config: SimulationConfig,
) -> Result<SimulationResult> {
    Ok(Simulator::new(situation, config)?.run_parallel())
}
