//! Error and rejection types shared by the engine and the front-ends.

use derive_more::{Display, Error};
use std::io;
use std::path::PathBuf;

/// Failures that prevent a game from starting at all.
#[derive(Debug, Display, Error)]
pub enum GameError {
    /// The word list could not be read.
    #[display("failed to load word list '{}': {source}", path.display())]
    Load { path: PathBuf, source: io::Error },
    /// The background loader went away without delivering a word list.
    #[display("word list loader stopped before finishing")]
    LoaderStopped,
    /// No candidate secret words are available.
    #[display("no candidate secret words available")]
    EmptyPool,
}

/// Why a guess or command was refused. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    #[display("Still loading the word list, please wait")]
    Loading,
    #[display("The game is over")]
    GameOver,
    #[display("Finish the current game first")]
    GameInProgress,
    #[display("Guess must be exactly 5 letters")]
    InvalidLength,
    #[display("Fill in every letter before submitting")]
    IncompleteRow,
    #[display("Word not found in the dictionary")]
    NotInDictionary,
}

/// Persistence failures for the statistics record.
#[derive(Debug, Display, Error)]
pub enum StatsError {
    #[display("stats I/O error: {source}")]
    Io { source: io::Error },
    #[display("stats serialization error: {source}")]
    Serialize { source: serde_json::Error },
    #[display("stats record is corrupt: {reason}")]
    Corrupt { reason: String },
}

impl From<io::Error> for StatsError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize { source }
    }
}
