//! ucb-mcts: play the 21 game against an MCTS player.
//!
//! ## Usage
//!
//! - `ucb-mcts` - Play against the computer (same as `ucb-mcts play`)
//! - `ucb-mcts play` - Pick a seat and play against the computer
//! - `ucb-mcts demo` - Watch the computer play itself
//!
//! Set `RUST_LOG=ucb_mcts=trace` to follow individual iterations.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ucb_mcts::budget::{Budget, CountBudget, TimeBudget};
use ucb_mcts::constants::{
    DEFAULT_EXPLORATION_CONSTANT, DEFAULT_PLAYOUTS, DEFAULT_TIME_LIMIT_SECS,
};
use ucb_mcts::mcts::{BestChildMode, Mcts};
use ucb_mcts::report::format_report;
use ucb_mcts::state::State;
use ucb_mcts::twentyone::{Player, TwentyOneState};
use ucb_mcts::ucb::{Ucb, unit_interval};

/// 21 game with an MCTS player
#[derive(Parser)]
#[command(name = "ucb-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SearchArgs {
    /// Report tree statistics after every computer move
    #[arg(long, global = true)]
    verbose: bool,

    /// Thinking time per computer move, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIME_LIMIT_SECS)]
    time_limit: f64,

    /// Fixed number of iterations per computer move (overrides --time-limit)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: Option<u32>,

    /// UCB exploration constant
    #[arg(long, global = true, default_value_t = DEFAULT_EXPLORATION_CONSTANT)]
    exploration_constant: f64,

    /// Random rollouts averaged per playout
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_PLAYOUTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    playouts: u32,

    /// How the final move is picked: average-reward, ucb or most-visited
    #[arg(long, global = true, default_value_t = BestChildMode::AverageReward)]
    decision: BestChildMode,

    /// Seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn solver(&self, seed_offset: u64) -> Mcts {
        let ucb = Ucb::new(self.exploration_constant, unit_interval);
        let solver = match self.seed {
            Some(seed) => Mcts::with_seed(ucb, seed.wrapping_add(seed_offset)),
            None => Mcts::new(ucb),
        };
        solver.with_decision(self.decision)
    }

    fn budget(&self) -> Box<dyn Budget> {
        match self.iterations {
            Some(n) => Box::new(CountBudget::new(n)),
            None => Box::new(TimeBudget::from_secs_f64(self.time_limit)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer
    Play,
    /// Let the computer play both sides
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.search.verbose);

    if !cli.search.time_limit.is_finite() || cli.search.time_limit < 0.0 {
        bail!("--time-limit must be a non-negative number of seconds");
    }

    match cli.command {
        Some(Commands::Demo) => run_demo(&cli.search),
        Some(Commands::Play) | None => run_play(&cli.search),
    }
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn init_tracing(verbose: bool) {
    let default = if verbose { "ucb_mcts=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Search for the computer's move, printing the report when verbose.
fn computer_move(solver: &mut Mcts, state: TwentyOneState, args: &SearchArgs) -> Result<u32> {
    let result = solver.search(state, args.budget())?;
    if args.verbose {
        println!("{}", format_report(&result)?);
    }
    Ok(result.best_action)
}

fn run_play(args: &SearchArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let human = loop {
        let line = prompt(&mut input, "select your player_id (1,2)>")?;
        match line.parse::<Player>() {
            Ok(p) => break p,
            Err(e) => println!("{e}"),
        }
    };
    let mut solver = args.solver(0);
    let mut state = TwentyOneState::new(args.playouts);

    while !state.is_terminal() {
        println!("current starting number:{}", state.cursor());
        println!("{}'s turn", state.player());

        let action = if state.player() == human {
            read_action(&mut input, &state)?
        } else {
            computer_move(&mut solver, state, args)?
        };

        println!("{}'s action: take {} steps", state.player(), action);
        state = state.next_state(action)?;
    }

    if state.winner() == Some(human) {
        println!("you win");
    } else {
        println!("you lose");
    }
    Ok(())
}

fn run_demo(args: &SearchArgs) -> Result<()> {
    println!("ucb-mcts: 21 game, computer vs computer\n");

    let mut solvers = [args.solver(0), args.solver(1)];
    let mut state = TwentyOneState::new(args.playouts);

    while !state.is_terminal() {
        let seat = match state.player() {
            Player::One => 0,
            Player::Two => 1,
        };
        println!("current starting number:{}", state.cursor());
        let action = computer_move(&mut solvers[seat], state, args)?;
        println!("{}'s action: take {} steps", state.player(), action);
        state = state.next_state(action)?;
    }

    if let Some(winner) = state.winner() {
        println!("{winner} wins");
    }
    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let n = input.read_line(&mut line).context("failed to read stdin")?;
    if n == 0 {
        bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

fn read_action(input: &mut impl BufRead, state: &TwentyOneState) -> Result<u32> {
    let actions = state.actions();
    let listed = actions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    loop {
        let line = prompt(input, &format!("take action ({listed})>"))?;
        match line.parse::<u32>() {
            Ok(a) if actions.contains(&a) => return Ok(a),
            _ => println!("choose one of {listed}"),
        }
    }
}
