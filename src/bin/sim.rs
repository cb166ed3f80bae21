use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use settlers_sim::board::MapSource;
use settlers_sim::cli::{GameStats, PolicyInstance, parse_lineup, print_policy_help};
use settlers_sim::config::RunConfig;
use settlers_sim::error::SetupError;
use settlers_sim::game::{Game, GameEvent};
use settlers_sim::players::RandomPolicy;
use tracing::error;
use tracing_subscriber::EnvFilter;

const EXIT_CONFIGURATION: u8 = 2;
const EXIT_INVARIANT: u8 = 3;

#[derive(Debug, Parser, Clone)]
#[command(name = "settlers-sim")]
#[command(about = "Settlement board game simulator - pit decision policies against each other")]
struct Args {
    /// TOML run configuration. Missing keys use defaults
    #[arg(long, default_value = "settlers.toml")]
    config: PathBuf,

    /// Comma-separated policy codes, one per seat (e.g. R,R,G,R)
    #[arg(long)]
    players: Option<String>,

    /// Board: "standard", "shuffled" or a path to a map description
    #[arg(long)]
    map: Option<MapSource>,

    /// Random seed; game i of a batch uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of rounds (capped at 8192)
    #[arg(long)]
    rounds: Option<u32>,

    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 1)]
    num: u32,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Show policy codes and exit
    #[arg(long)]
    help_players: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.help_players {
        print_policy_help();
        return ExitCode::SUCCESS;
    }

    let mut config = RunConfig::load(&args.config);
    if let Some(map) = &args.map {
        config.map = map.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.set_max_rounds(i64::from(rounds));
    }

    let policies: Vec<PolicyInstance> = match &args.players {
        Some(codes) => match parse_lineup(codes) {
            Ok(policies) => policies,
            Err(err) => {
                error!(%err, "use --help-players to see available codes");
                return ExitCode::from(EXIT_CONFIGURATION);
            }
        },
        None => vec![PolicyInstance::Random(RandomPolicy); config.players],
    };
    config.players = policies.len();

    match run(&args, &config, &policies) {
        Ok(stats) => {
            if !args.quiet && args.num > 1 {
                print_summary(&stats, &policies);
            }
            ExitCode::SUCCESS
        }
        Err(err) if err.is_configuration() => {
            error!(%err, "configuration error");
            ExitCode::from(EXIT_CONFIGURATION)
        }
        Err(err) => {
            error!(%err, "board invariant violated");
            ExitCode::from(EXIT_INVARIANT)
        }
    }
}

fn run(
    args: &Args,
    config: &RunConfig,
    policies: &[PolicyInstance],
) -> Result<GameStats, SetupError> {
    let mut stats = GameStats::new(policies.len());
    let show_events = !args.quiet && args.num == 1;

    for game_idx in 0..args.num {
        let mut game_config = config.game_config();
        game_config.seed = config.seed.wrapping_add(u64::from(game_idx));

        let start = Instant::now();
        let mut game = Game::new(game_config, &config.map)?;
        let outcome = game.play(policies, |event| {
            if show_events {
                print_event(event, args.json);
            }
        });
        let duration = start.elapsed();
        stats.record_game(&game, outcome, duration);

        if !args.quiet && args.num > 1 {
            println!(
                "Game {:>4}: {}, Rounds={:>4}, Duration={:?}",
                game_idx + 1,
                outcome,
                game.state.round,
                duration
            );
        }
    }
    Ok(stats)
}

fn print_event(event: &GameEvent, json: bool) {
    if !json {
        println!("{event}");
        return;
    }
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(err) => error!(%err, "cannot serialize event"),
    }
}

fn print_summary(stats: &GameStats, policies: &[PolicyInstance]) {
    println!("\n{}", "=".repeat(60));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(60));

    println!("\nPlayer Summary:");
    println!("{:<15} {:<10} {:<12} {:<12}", "Player", "Wins", "Win Rate", "Avg VP");
    println!("{}", "-".repeat(50));
    for (seat, policy) in policies.iter().enumerate() {
        println!(
            "{:<15} {:<10} {:<11.1}% {:<12.2}",
            format!("{} ({seat})", policy.name()),
            stats.wins.get(seat).copied().unwrap_or(0),
            stats.win_rate(seat) * 100.0,
            stats.avg_victory_points(seat)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Ended By Round Limit: {}", stats.round_limit_endings);
    println!("  Avg Rounds: {:.2}", stats.avg_rounds());
    println!("  Avg Duration: {:.2?}", stats.avg_duration());
}
