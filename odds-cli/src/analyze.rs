use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use itertools::Itertools;
use rand::{rngs::SmallRng, SeedableRng};
use strum::IntoEnumIterator;

use odds_core::prelude::{
    compute_outs, simulate_equity, simulate_equity_parallel, simulate_stages, HandRank,
    OutsResult, RngSource, SimulationConfig, SimulationResult, Situation, Stage, StageReport,
    DEFAULT_TRIALS,
};

#[derive(Debug, Args)]
pub struct KnownCards {
    /// Your two hole cards, e.g. "As Ah"
    #[arg(long = "hand")]
    hand: String,

    /// Community cards, e.g. "Kd 7c 2s" (empty before the flop)
    #[arg(long = "board", default_value = "")]
    board: String,
}

impl KnownCards {
    fn situation(&self) -> Result<Situation> {
        Situation::parse(&self.hand, &self.board)
            .with_context(|| format!("bad cards: hand {:?}, board {:?}", self.hand, self.board))
    }
}

#[derive(Debug, Args)]
pub struct SimulationArgs {
    /// Players at the table, including you
    #[arg(short = 'p', long = "players", default_value = "2")]
    players: usize,

    /// Monte Carlo trials per stage
    #[arg(short = 'i', long = "trials", default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Seed the random deals for a reproducible run
    #[arg(long = "seed")]
    seed: Option<u64>,
}

impl SimulationArgs {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            trials: self.trials,
            player_count: self.players,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommands {
    /// Current hand, improvement odds and equity at every known stage
    Report {
        #[command(flatten)]
        cards: KnownCards,

        #[command(flatten)]
        simulation: SimulationArgs,
    },
    /// Exact odds of improving on the next cards
    Outs {
        #[command(flatten)]
        cards: KnownCards,
    },
    /// Win/tie/loss against random opponents for the cards as they are
    Equity {
        #[command(flatten)]
        cards: KnownCards,

        #[command(flatten)]
        simulation: SimulationArgs,

        /// Run on a single thread (for profiling)
        #[arg(long = "single-threaded", default_value = "false")]
        single_threaded: bool,
    },
}

fn rank_width() -> usize {
    HandRank::iter()
        .map(|rank| rank.name().len())
        .max()
        .unwrap_or_default()
}

fn print_situation(situation: &Situation) {
    let hand = situation.hand().iter().join(" ");
    let board = if situation.board().is_empty() {
        "-".to_owned()
    } else {
        situation.board().iter().join(" ")
    };
    println!("Hand: {hand}   Board: {board}");

    match situation.current_hand() {
        Some(current) if situation.board().is_empty() => {
            println!("Current hand: {} (provisional)", current.rank);
        }
        Some(current) => println!("Current hand: {}", current.rank),
        None => println!("Current hand: --"),
    }
}

fn print_outs(outs: &OutsResult) {
    if outs.categories.is_empty() {
        return;
    }

    let width = rank_width();
    println!(
        "Improvement odds ({} card{} to come, {} unseen):",
        outs.cards_to_come,
        if outs.cards_to_come == 1 { "" } else { "s" },
        outs.remaining_deck
    );
    println!(
        " - {:width$} {:>6.2}% ({} outs)",
        "Any improvement",
        outs.any_improvement,
        outs.total_outs()
    );
    for category in &outs.categories {
        println!(
            " - {:width$} {:>6.2}% ({} outs: {})",
            category.rank.name(),
            category.probability,
            category.count(),
            category.cards.iter().join(" ")
        );
    }
}

fn print_equity(stage: &str, result: &SimulationResult) {
    println!(
        " {stage:<8} win {:>6.2}%  tie {:>6.2}%  loss {:>6.2}%",
        result.win_rate, result.tie_rate, result.loss_rate
    );
}

fn print_opponents(report: &StageReport) {
    let width = rank_width();
    let stages: Vec<Stage> = report.iter().map(|(stage, _)| stage).collect();

    println!(
        "   {:width$} {}",
        "Opponent hands",
        stages.iter().map(|stage| format!("{stage:>16}")).join(""),
    );
    for rank in HandRank::iter().rev() {
        let cells = report
            .iter()
            .map(|(stage, result)| {
                let shift = report
                    .shift(stage, rank)
                    .map(|shift| format!(" ({shift})"))
                    .unwrap_or_default();
                format!("{:>16}", format!("{:.2}%{shift}", result.opponent_prob(rank)))
            })
            .join("");
        println!(" - {:width$} {cells}", rank.name());
    }
}

fn report(cards: &KnownCards, simulation: &SimulationArgs) -> Result<()> {
    let situation = cards.situation()?;
    print_situation(&situation);

    let outs = compute_outs(situation.known())?;
    print_outs(&outs);

    let report = simulate_stages(&situation, simulation.config(), |stage| {
        eprintln!("Calculating {stage} odds against {} opponent(s)...", simulation.players - 1);
    })?;

    println!("Equity:");
    for (stage, result) in report.iter() {
        print_equity(&stage.to_string(), result);
    }
    print_opponents(&report);

    Ok(())
}

fn outs(cards: &KnownCards) -> Result<()> {
    let situation = cards.situation()?;
    print_situation(&situation);

    let outs = compute_outs(situation.known())?;
    if outs.categories.is_empty() {
        println!("No exact improvement odds with {} card(s) to come.", outs.cards_to_come);
    } else {
        print_outs(&outs);
    }

    Ok(())
}

fn equity(cards: &KnownCards, simulation: &SimulationArgs, single_threaded: bool) -> Result<()> {
    let situation = cards.situation()?;
    let config = simulation.config();

    let result = if single_threaded {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        simulate_equity(&situation, config, &mut RngSource::new(rng))?
    } else {
        simulate_equity_parallel(&situation, config)?
    };

    print_situation(&situation);
    println!(
        "Equity over {} trials against {} opponent(s):",
        result.trials,
        result.player_count - 1
    );
    print_equity("", &result);

    let width = rank_width();
    for (rank, prob) in result.opponent_probs() {
        println!(" - {:width$} {prob:>6.2}%", rank.name());
    }

    Ok(())
}

pub fn run(command: &CliCommands) -> Result<()> {
    match command {
        CliCommands::Report { cards, simulation } => report(cards, simulation),
        CliCommands::Outs { cards } => outs(cards),
        CliCommands::Equity {
            cards,
            simulation,
            single_threaded,
        } => equity(cards, simulation, *single_threaded),
    }
}
