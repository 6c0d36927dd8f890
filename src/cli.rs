use crate::error::GameError;
use crate::evaluator::{WORD_LENGTH, feedback_to_emoji};
use crate::game::{EventOutcome, Game, GameInterface, UserAction};
use crate::game_state::{DEFAULT_MAX_ATTEMPTS, GameStatus};
use crate::wordbank::WordSource;
use clap::Parser;
use clap::builder::TypedValueParser;
use std::io::BufRead;
use std::path::PathBuf;

/// Guess the secret five-letter word
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited dictionary of valid guesses
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Path to a newline-delimited list of possible secrets
    #[arg(short = 'a', long = "answers")]
    pub answers_path: Option<PathBuf>,

    /// Directory holding the statistics record
    #[arg(long)]
    pub stats_dir: Option<PathBuf>,

    /// Seed for choosing secrets, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of guesses allowed per game
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_ATTEMPTS,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub max_attempts: usize,

    /// Line-based play on stdin/stdout instead of the full-screen interface
    #[arg(long)]
    pub plain: bool,

    /// Append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn word_source(&self) -> WordSource {
        WordSource {
            dictionary: self.wordbank_path.clone(),
            answers: self.answers_path.clone(),
            seed: self.seed,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub fn read_guess<R: BufRead>(reader: &mut R) -> UserAction {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        // End of input behaves like `exit`
        Ok(0) => return UserAction::Exit,
        Err(e) => {
            log::warn!("Failed to read a guess, exiting: {e}");
            return UserAction::Exit;
        }
        Ok(_) => {}
    }
    let input = input.trim().to_uppercase();

    match input.as_str() {
        "EXIT" => UserAction::Exit,
        "NEXT" => UserAction::NewGame,
        _ => UserAction::Guess(input),
    }
}

fn display_prompt(game: &Game) {
    match game.session() {
        None => println!("\nLoading word list..."),
        Some(session) if session.is_terminal() => {
            println!("\nType 'next' to play again or 'exit' to quit:");
        }
        Some(session) => println!(
            "\nGuess {}/{} ({WORD_LENGTH} letters, 'next' for a new word, 'exit' to quit):",
            session.current_row() + 1,
            session.max_attempts()
        ),
    }
}

fn display_board(game: &Game) {
    let Some(session) = game.session() else {
        return;
    };
    for row in session.rows() {
        let spaced: Vec<String> = row.word.chars().map(String::from).collect();
        println!("{}   {}", spaced.join(" "), feedback_to_emoji(&row.feedback));
    }
}

pub fn display_stats(game: &Game) {
    let stats = game.stats();
    println!(
        "Played: {} | Won: {} ({:.0}%) | Streak: {} | Best: {}",
        stats.games_played,
        stats.games_won,
        stats.win_rate() * 100.0,
        stats.current_streak,
        stats.best_streak
    );
    if !stats.recent_outcomes.is_empty() {
        println!("Recent words: {}", stats.recent_outcomes.join(", "));
    }
}

/// Line-oriented implementation of [`GameInterface`] over any reader.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_loading(&mut self) {
        println!("Loading word list...");
    }

    fn display_new_game(&mut self, game: &Game) {
        println!(
            "New game started. Guess the {WORD_LENGTH}-letter word in {} attempts.",
            game.max_attempts()
        );
    }

    fn read_action(&mut self, game: &Game) -> Option<UserAction> {
        display_prompt(game);
        Some(read_guess(&mut self.reader))
    }

    fn display_outcome(&mut self, game: &Game, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Rejected(rejection) => println!("Invalid guess: {rejection}."),
            EventOutcome::Evaluated(result) => {
                display_board(game);
                let secret = game
                    .session()
                    .and_then(|session| session.final_word())
                    .unwrap_or_default();
                match result.status {
                    GameStatus::Won => {
                        println!("You won! The word was {secret}.");
                        display_stats(game);
                    }
                    GameStatus::Lost => {
                        println!("Game over. The word was {secret}.");
                        display_stats(game);
                    }
                    GameStatus::Active => {}
                }
            }
            EventOutcome::Typed(_)
            | EventOutcome::Deleted
            | EventOutcome::Ignored
            | EventOutcome::Restarted => {}
        }
    }

    fn display_fatal(&mut self, error: &GameError) {
        eprintln!("Cannot start the game: {error}");
    }

    fn display_exit_message(&mut self) {
        println!("Exiting.");
    }
}
