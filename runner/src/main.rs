// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for single games, batches and odds tables
// ═══════════════════════════════════════════════════════════════════════

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use risk_engine::map::{self, MapGraph};
use risk_engine::setup::create_initial_state;
use risk_engine::{EventLog, RulesConfig};
use risk_tournament::{
    make_agents, probability_table, run_batch, run_game, BatchConfig, GameSummary, Lineup, RunLimits,
};
use std::error::Error;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "risk-runner", about = "Risk Strategy Lab")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GameOpts {
    #[arg(short, long, default_value_t = 4)]
    players: usize,
    /// "aggressive", "passive", "random", "mixed", or a comma list per seat
    #[arg(short, long, default_value = "mixed")]
    agent: Lineup,
    /// Stop after this many full rounds
    #[arg(short, long, default_value_t = 50)]
    rounds: u32,
    /// Map definition JSON (defaults to the classic 42-territory board)
    #[arg(long)]
    map: Option<PathBuf>,
    /// Rules JSON; missing keys keep their defaults
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single game and print the standings
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[command(flatten)]
        game: GameOpts,
        /// Write the event log here as JSON Lines
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Run N seeded games in parallel and compare strategies
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        /// Game g is seeded with seed + g
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[command(flatten)]
        game: GameOpts,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Monte Carlo table of full-battle win chances
    Odds {
        #[arg(long, default_value_t = 10)]
        max_attackers: u32,
        #[arg(long, default_value_t = 10)]
        max_defenders: u32,
        #[arg(short, long, default_value_t = 10_000)]
        trials: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play { seed, game, log } => cmd_play(seed, &game, log.as_deref()),
        Commands::Batch { games, seed, game, json } => cmd_batch(games, seed, &game, json),
        Commands::Odds { max_attackers, max_defenders, trials, seed } => {
            cmd_odds(max_attackers, max_defenders, trials, seed);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn load_map(path: Option<&Path>) -> CliResult<Arc<MapGraph>> {
    let graph = match path {
        Some(p) => MapGraph::from_json(&fs::read_to_string(p)?)?,
        None => map::classic()?,
    };
    Ok(Arc::new(graph))
}

fn load_rules(path: Option<&Path>) -> CliResult<RulesConfig> {
    let rules = match path {
        Some(p) => RulesConfig::from_json(&fs::read_to_string(p)?)?,
        None => RulesConfig::default(),
    };
    rules.validate()?;
    Ok(rules)
}

fn cmd_play(seed: u64, opts: &GameOpts, log_path: Option<&Path>) -> CliResult {
    println!("=== Risk Strategy Lab ===\n");
    println!("Running single game: seed={}, players={}, agents={:?}\n", seed, opts.players, opts.agent);

    let map = load_map(opts.map.as_deref())?;
    let rules = load_rules(opts.rules.as_deref())?;
    let names: Vec<String> = opts.agent.seats(opts.players).iter()
        .enumerate()
        .map(|(i, kind)| format!("{}-{}", kind, i + 1))
        .collect();

    tracing::info!(seed, players = opts.players, rounds = opts.rounds, "starting game");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = create_initial_state(map, &names, rules, &mut rng)?;
    let mut agents = make_agents(&opts.agent, opts.players, seed);
    let summary = run_game(&mut state, &mut agents, &mut rng, RunLimits::rounds(opts.rounds))?;

    print_summary(&summary);
    if let Some(path) = log_path {
        write_log(&state.log, path)?;
        println!("\nEvent log ({} records) written to: {}", state.log.len(), path.display());
    }
    Ok(())
}

fn print_summary(summary: &GameSummary) {
    println!("Game stopped ({:?})", summary.stop);
    println!("  Rounds played: {}", summary.rounds_completed);
    println!("  Turns: {}, decisions: {}, rejected: {}", summary.turns, summary.decisions, summary.rejections);
    println!();
    println!("  Final standings:");
    println!("    {:<16} {:<12} {:>6} {:>7} {:>6} {:>6}", "Player", "Agent", "Land", "Armies", "Cards", "Conts");
    for s in &summary.standings {
        let name = if s.eliminated { format!("{} (out)", s.name) } else { s.name.clone() };
        println!("    {:<16} {:<12} {:>6} {:>7} {:>6} {:>6}",
            name, s.agent, s.territories, s.armies, s.cards, s.continents);
    }
    if let Some(leader) = summary.leader() {
        println!("\n  Leader: {} ({})", leader.name, leader.player);
    }
}

fn write_log(log: &EventLog, path: &Path) -> CliResult {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for record in log.iter() {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    tracing::debug!(records = log.len(), path = %path.display(), "event log written");
    Ok(())
}

fn cmd_batch(games: u32, seed: u64, opts: &GameOpts, json: bool) -> CliResult {
    let config = BatchConfig {
        map: load_map(opts.map.as_deref())?,
        rules: load_rules(opts.rules.as_deref())?,
        lineup: opts.agent.clone(),
        players: opts.players,
        games,
        seed,
        limits: RunLimits::rounds(opts.rounds),
    };
    let report = run_batch(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Batch: {} games, {} players, agents={:?} ===\n", games, opts.players, opts.agent);
    println!("--- Summary ({} completed, {} errors) ---", report.completed, report.failures.len());
    if report.completed > 0 {
        println!("  Avg rounds: {:.1}", report.total_rounds as f64 / f64::from(report.completed));
    }
    println!();
    println!("  {:<12} {:>6} {:>8} {:>8} {:>10} {:>10}", "Strategy", "Seats", "Lead %", "Out", "Avg land", "Avg armies");
    println!("  {}", "-".repeat(60));
    for (kind, r) in &report.records {
        println!("  {:<12} {:>6} {:>7.1}% {:>8} {:>10.1} {:>10.1}",
            kind.to_string(), r.seats, r.lead_rate() * 100.0, r.eliminated, r.avg_territories(), r.avg_armies());
    }
    for (seed, err) in &report.failures {
        eprintln!("  seed {}: ERROR -- {}", seed, err);
    }
    Ok(())
}

fn cmd_odds(max_attackers: u32, max_defenders: u32, trials: u32, seed: u64) {
    let table = probability_table(max_attackers, max_defenders, trials, seed);

    println!("=== Attack success odds ({} trials per cell) ===\n", trials);
    print!("{:>4} |", "A\\D");
    for d in 1..=max_defenders {
        print!(" {:>5}", d);
    }
    println!();
    println!("{}", "-".repeat(6 + 6 * max_defenders as usize));
    for (i, row) in table.rows.iter().enumerate() {
        print!("{:>4} |", i + 1);
        for p in row {
            print!(" {:>5.3}", p);
        }
        println!();
    }
}
