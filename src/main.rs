use std::io;
use std::process::ExitCode;
use termo::cli::{Cli, CliInterface, parse_cli};
use termo::logging::init_logger;
use termo::stats::{FileBackend, StatsStore};
use termo::tui::TuiInterface;
use termo::wordbank::WordLoader;
use termo::{Game, GameError, game_loop};

fn open_stats(cli: &Cli) -> StatsStore {
    match &cli.stats_dir {
        Some(dir) => StatsStore::open(FileBackend::new(dir)),
        None => StatsStore::open_default(),
    }
}

fn run_plain(mut game: Game, loader: WordLoader) -> Result<(), GameError> {
    // A blocking stdin read cannot notice the load finishing, so plain mode
    // waits for the word list before the first prompt.
    game.attach_words(loader.wait()?)?;
    let stdin = io::stdin();
    let mut interface = CliInterface::new(stdin.lock());
    game_loop(&mut game, None, &mut interface)
}

fn run_tui(
    mut game: Game,
    loader: WordLoader,
    mut interface: TuiInterface,
) -> Result<(), GameError> {
    // The interface is dropped on return, restoring the terminal before any
    // error is printed.
    game_loop(&mut game, Some(loader), &mut interface)
}

fn main() -> ExitCode {
    let cli = parse_cli();
    // Log lines would corrupt the full-screen interface unless sent to a file
    let default_filter = if cli.plain || cli.log_file.is_some() {
        "warn"
    } else {
        "off"
    };
    init_logger(cli.log_file.as_deref(), default_filter);

    let game = Game::new(open_stats(&cli), cli.max_attempts);
    let loader = WordLoader::spawn(cli.word_source());

    let result = if cli.plain {
        run_plain(game, loader)
    } else {
        match TuiInterface::new() {
            Ok(interface) => run_tui(game, loader, interface),
            Err(e) => {
                eprintln!("Failed to start the terminal interface: {e}");
                eprintln!("Try --plain for line-based play.");
                return ExitCode::FAILURE;
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
