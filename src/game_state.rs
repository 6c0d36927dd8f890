//! Single-game state machine: rows, typed input, and win/loss detection.
//!
//! A session starts `Active` on row 0. Each accepted guess is scored and
//! appended to the history; guessing the secret moves to `Won`, using up the
//! last row moves to `Lost`. Terminal states never go back to `Active` except
//! through an explicit reset with a new secret.

use crate::error::Rejection;
use crate::evaluator::{Feedback, WORD_LENGTH, evaluate};
use crate::wordbank::Dictionary;
use crate::{debug_log, info_log};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_ATTEMPTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A submitted guess and how it scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRow {
    pub word: String,
    pub feedback: [Feedback; WORD_LENGTH],
}

/// What an accepted guess produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessResult {
    pub word: String,
    pub feedback: [Feedback; WORD_LENGTH],
    pub status: GameStatus,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    secret: String,
    max_attempts: usize,
    current_row: usize,
    rows: Vec<GuessRow>,
    status: GameStatus,
    input: String,
}

impl GameSession {
    /// Start a session; `max_attempts` is clamped to at least one row.
    pub fn new(secret: impl Into<String>, max_attempts: usize) -> Self {
        Self {
            secret: secret.into().to_uppercase(),
            max_attempts: max_attempts.max(1),
            current_row: 0,
            rows: Vec::new(),
            status: GameStatus::Active,
            input: String::new(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn rows(&self) -> &[GuessRow] {
        &self.rows
    }

    /// Letters typed into the current row so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn attempts_remaining(&self) -> usize {
        self.max_attempts - self.rows.len()
    }

    /// The secret, once the game has ended.
    pub fn final_word(&self) -> Option<&str> {
        self.is_terminal().then_some(self.secret.as_str())
    }

    /// Score a whole word.
    ///
    /// On rejection nothing changes. On success the row is recorded, the typed
    /// input is cleared and the status moves on.
    pub fn submit_guess(
        &mut self,
        word: &str,
        dictionary: &Dictionary,
    ) -> Result<GuessResult, Rejection> {
        if self.is_terminal() {
            return Err(Rejection::GameOver);
        }
        let word = word.to_uppercase();
        if word.is_empty() || word.chars().any(char::is_whitespace) {
            return Err(Rejection::IncompleteRow);
        }
        if word.chars().count() != WORD_LENGTH {
            return Err(Rejection::InvalidLength);
        }
        if !dictionary.contains(&word) {
            debug_log!("submit_guess() - '{}' not in dictionary", word);
            return Err(Rejection::NotInDictionary);
        }

        let feedback = evaluate(&self.secret, &word);
        self.rows.push(GuessRow {
            word: word.clone(),
            feedback,
        });
        self.input.clear();

        if word == self.secret {
            self.status = GameStatus::Won;
        } else if self.current_row + 1 >= self.max_attempts {
            self.status = GameStatus::Lost;
        } else {
            self.current_row += 1;
        }
        info_log!(
            "submit_guess() - row {} '{}' -> {:?}",
            self.rows.len(),
            word,
            self.status
        );

        Ok(GuessResult {
            word,
            feedback,
            status: self.status,
        })
    }

    /// Type one letter into the current row. Returns whether it was taken.
    ///
    /// Letters whose uppercase form is more than one character (`ß`) are
    /// refused, so each key fills exactly one cell.
    pub fn push_letter(&mut self, letter: char) -> bool {
        if self.is_terminal()
            || !letter.is_alphabetic()
            || self.input.chars().count() >= WORD_LENGTH
        {
            return false;
        }
        let mut upper = letter.to_uppercase();
        let (Some(cell), None) = (upper.next(), upper.next()) else {
            return false;
        };
        self.input.push(cell);
        true
    }

    /// Erase the last typed letter. Returns whether anything was erased.
    pub fn pop_letter(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.input.pop().is_some()
    }

    /// Submit the typed row. A partly filled row is refused and kept as is.
    pub fn submit_input(&mut self, dictionary: &Dictionary) -> Result<GuessResult, Rejection> {
        if self.is_terminal() {
            return Err(Rejection::GameOver);
        }
        if self.input.chars().count() < WORD_LENGTH {
            return Err(Rejection::IncompleteRow);
        }
        let word = self.input.clone();
        self.submit_guess(&word, dictionary)
    }

    /// Start over with a new secret after the game has ended.
    pub fn reset(&mut self, new_secret: impl Into<String>) -> Result<(), Rejection> {
        if !self.is_terminal() {
            return Err(Rejection::GameInProgress);
        }
        self.force_reset(new_secret);
        Ok(())
    }

    /// Start over regardless of the current status.
    pub fn force_reset(&mut self, new_secret: impl Into<String>) {
        self.secret = new_secret.into().to_uppercase();
        self.current_row = 0;
        self.rows.clear();
        self.input.clear();
        self.status = GameStatus::Active;
        info_log!("reset() - new game with {} attempts", self.max_attempts);
    }

    /// Best feedback seen per letter across all submitted rows.
    ///
    /// Correct beats Present beats Absent, so a letter once shown green stays
    /// green even if a later row scores it differently elsewhere.
    pub fn letter_states(&self) -> BTreeMap<char, Feedback> {
        let mut states = BTreeMap::new();
        for row in &self.rows {
            for (letter, feedback) in row.word.chars().zip(row.feedback) {
                states
                    .entry(letter)
                    .and_modify(|best: &mut Feedback| *best = (*best).max(feedback))
                    .or_insert(feedback);
            }
        }
        states
    }
}
