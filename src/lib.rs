// Library interface for termo
// This allows integration tests to access internal modules

pub mod cli;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod game_state;
pub mod logging;
pub mod stats;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use error::{GameError, Rejection, StatsError};
pub use evaluator::{Feedback, WORD_LENGTH, evaluate};
pub use game::{EventOutcome, Game, GameEvent, GameInterface, UserAction, game_loop};
pub use game_state::{DEFAULT_MAX_ATTEMPTS, GameSession, GameStatus, GuessResult, GuessRow};
pub use stats::{FileBackend, MemoryBackend, Stats, StatsBackend, StatsStore};
pub use wordbank::{
    Dictionary, WordLoader, WordSource, WordStore, load_wordbank_from_file, load_wordbank_from_str,
};
