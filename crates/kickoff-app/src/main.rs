// kickoff entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries the JSON result)
// 2. Load config
// 3. Load the squad
// 4. Generate, then re-roll as requested
// 5. Print the last result as JSON

use kickoff_app::config;
use kickoff_app::session::{GenerationRequest, Session};
use kickoff_app::squad;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

/// Split a squad into balanced soccer teams.
#[derive(Parser, Debug)]
#[command(name = "kickoff")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of teams (default: generator.num_teams from config)
    #[arg(short, long)]
    teams: Option<usize>,

    /// Squad CSV file (default: data_paths.players from config)
    #[arg(short, long)]
    players: Option<PathBuf>,

    /// Random seed (default: generator.seed from config, else random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Only use players flagged in the `selected` column
    #[arg(long)]
    selected_only: bool,

    /// Regenerate this many times after the first run and keep the last
    #[arg(short, long, default_value = "0")]
    rerolls: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing()?;
    info!("kickoff starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} teams, {}-{}-{} formation",
        config.generator.num_teams,
        config.formation.defenders,
        config.formation.midfielders,
        config.formation.forwards
    );

    let players_path = args
        .players
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data_paths.players));
    let loaded = squad::load_squad(&players_path)
        .with_context(|| format!("failed to load squad from {}", players_path.display()))?;

    let num_teams = args.teams.unwrap_or(config.generator.num_teams);
    let request = if args.selected_only {
        GenerationRequest::selected(num_teams, loaded.selected.clone())
    } else {
        GenerationRequest::all(num_teams)
    };

    let mut rng = match args.seed.or(config.generator.seed) {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let mut session = Session::new(loaded.players, config.formation)
        .with_jitter(config.generator.jitter_amplitude);
    session
        .generate(request, &mut rng)
        .context("failed to generate teams")?;
    for n in 1..=args.rerolls {
        session
            .regenerate(&mut rng)
            .with_context(|| format!("failed to regenerate teams (reroll {n})"))?;
    }

    let result = session
        .last_result()
        .context("no generation result available")?;
    if !result.dropped.is_empty() {
        info!("{} players did not fit any team", result.dropped.len());
    }

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), result).context("failed to write result")?;
    println!();

    info!("kickoff finished");
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for the result).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("kickoff.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("kickoff=info,kickoff_app=info,kickoff_core=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
