use anyhow::Context;
use chromatch_core as game;
use chrono::prelude::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod grid;
mod memory;
mod render;
mod settings;
mod store;
mod sync;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory holding records, settings and the sync outbox
    #[arg(long, default_value = ".chromatch")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recolor the grid until it matches the win rule
    Grid(grid::GridArgs),
    /// Memorize the tiles, then find the target color
    Memory(memory::MemoryArgs),
    /// Show or reset the leaderboard of a mode, for example `uniform-easy` or `memory-hard`
    Scores {
        mode: String,
        #[arg(long)]
        reset: bool,
    },
    /// Best scores across every mode
    Stats,
    /// Show or change the player name used for high scores
    Player { name: Option<String> },
}

/// Everything a game loop needs from the host besides the engine.
pub(crate) struct Host {
    pub store: store::FileStore,
    pub remote: sync::OutboxSync,
    pub settings: settings::Settings,
    pub seed: u64,
}

impl Host {
    fn open(args: &Args) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&args.data_dir)
            .with_context(|| format!("Could not create {}", args.data_dir.display()))?;

        let store = store::FileStore::open(args.data_dir.join("store.json"))?;
        log::debug!("Records kept in {}", store.path().display());
        let remote = sync::OutboxSync::new(args.data_dir.join("outbox.jsonl"));
        let seed = args.seed.unwrap_or_else(random_seed);
        let mut settings = settings::Settings::load(&store);
        settings.ensure_user_id(seed);

        Ok(Self {
            store,
            remote,
            settings,
            seed,
        })
    }
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    let millis = web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    let millis = millis.try_into().unwrap_or(i64::MAX);
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

fn random_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn all_mode_keys() -> Vec<String> {
    let grid = [game::WinRule::Uniform, game::WinRule::IsolatedCount]
        .into_iter()
        .flat_map(|rule| {
            game::GridMode::ALL
                .into_iter()
                .map(move |mode| game::GridConfig::new(mode, rule).key())
        });
    let memory = game::MemoryMode::ALL.into_iter().map(|mode| mode.key().to_string());
    grid.chain(memory).collect()
}

/// Logs go to stderr, stdout belongs to the game.
fn logger(verbose: &clap_verbosity_flag::Verbosity) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(verbose.log_level_filter())
        .format_timestamp(None);
    builder
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger(&args.verbose).try_init()?;

    let mut host = Host::open(&args)?;
    log::debug!("seed: {}", host.seed);

    match args.command {
        Command::Grid(grid_args) => grid::run(&mut host, grid_args)?,
        Command::Memory(memory_args) => memory::run(&mut host, memory_args)?,
        Command::Scores { mode, reset } => {
            if reset {
                game::Leaderboard::reset(&mut host.store, &mode)?;
                println!("Leaderboard {mode} cleared");
            } else {
                let board = game::Leaderboard::load(&host.store, &mode);
                print!("{}", render::leaderboard(&board));
            }
        }
        Command::Stats => {
            let keys = all_mode_keys();
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            let stats = game::ScoreboardStats::collect(&host.store, &keys);
            print!("{}", render::stats(&stats));
        }
        Command::Player { name } => {
            if let Some(name) = name {
                host.settings.player_name = Some(name);
            }
            println!("Player: {}", host.settings.player_name());
        }
    }

    host.settings.save(&mut host.store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_key_is_listed_once() {
        let keys = all_mode_keys();
        assert_eq!(keys.len(), 10);
        assert!(keys.contains(&"isolated-medium".to_string()));
        assert!(keys.contains(&"memory-levelup".to_string()));

        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }

    #[test]
    fn verbosity_sets_log_filter() {
        let filter = |argv: &[&str]| {
            let args = Args::try_parse_from(argv).unwrap();
            logger(&args.verbose).build().filter()
        };

        assert_eq!(filter(&["chromatch", "stats"]), log::LevelFilter::Error);
        assert_eq!(filter(&["chromatch", "-vv", "stats"]), log::LevelFilter::Info);
        assert_eq!(filter(&["chromatch", "-q", "stats"]), log::LevelFilter::Off);
    }

    #[test]
    fn args_parse_subcommands() {
        let argv = ["chromatch", "--seed", "7", "scores", "memory-easy", "--reset"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.seed, Some(7));
        assert!(matches!(args.command, Command::Scores { reset: true, .. }));
    }
}
