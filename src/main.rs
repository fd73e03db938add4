use hangman::catalog::load_catalog;
use hangman::cli::{Cli, CliInterface, parse_cli};
use hangman::game_state::{Session, game_loop};
use hangman::logging;
use hangman::stats::{FileStatsStore, MemoryStatsStore, StatsStore, StatsTracker, default_stats_path};
use hangman::tui::TuiInterface;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;

fn run<S: StatsStore>(cli: &Cli, store: S) -> ExitCode {
    let catalog = match load_catalog(cli.catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(catalog, StatsTracker::new(store), rng, cli.max_misses);

    if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&mut session, &mut interface);
        return ExitCode::SUCCESS;
    }

    match TuiInterface::new() {
        Ok(mut interface) => {
            game_loop(&mut session, &mut interface);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to start terminal UI: {e}");
            eprintln!("Failed to start terminal UI: {e}. Try --plain.");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = parse_cli();

    // The terminal UI owns the screen, so its logs always go to a file.
    let log_path = cli
        .log_path
        .clone()
        .or_else(|| (!cli.plain).then(logging::default_log_path).flatten());
    logging::init(log_path.as_deref());

    if cli.no_stats {
        return run(&cli, MemoryStatsStore::new());
    }
    match cli.stats_path.clone().or_else(default_stats_path) {
        Some(path) => {
            log::info!("Using stats file {}", path.display());
            run(&cli, FileStatsStore::open(path))
        }
        None => {
            log::warn!("No data directory available; stats will not be saved");
            run(&cli, MemoryStatsStore::new())
        }
    }
}
