//! Per-letter feedback for a guess against the secret word.

pub const WORD_LENGTH: usize = 5;

/// Classification of one guessed letter.
///
/// Variants are ordered by strength so the keyboard view can keep the best
/// result seen for a letter with a plain `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feedback {
    /// Not in the secret (gray)
    Absent,
    /// In the secret, different position (yellow)
    Present,
    /// Right letter, right position (green)
    Correct,
}

impl Feedback {
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }

    #[must_use]
    pub const fn to_emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

/// Score `guess` against `secret`.
///
/// Each position is judged on its own: an exact match is `Correct`, a letter
/// found anywhere else in the secret is `Present`. Repeated letters are not
/// counted against the secret's remaining occurrences, so a doubled guess
/// letter can be marked `Present` twice for a single secret letter.
///
/// Both words are expected to be uppercase and five characters long; missing
/// guess positions come back as `Absent`.
#[must_use]
pub fn evaluate(secret: &str, guess: &str) -> [Feedback; WORD_LENGTH] {
    let secret: Vec<char> = secret.chars().collect();
    let mut feedback = [Feedback::Absent; WORD_LENGTH];

    for (i, letter) in guess.chars().take(WORD_LENGTH).enumerate() {
        feedback[i] = if secret.get(i) == Some(&letter) {
            Feedback::Correct
        } else if secret.contains(&letter) {
            Feedback::Present
        } else {
            Feedback::Absent
        };
    }
    feedback
}

/// Render feedback as `G`/`Y`/`X` codes, e.g. `XGGYG`.
#[must_use]
pub fn feedback_to_string(feedback: &[Feedback]) -> String {
    feedback.iter().map(|f| f.to_char()).collect()
}

/// Render feedback as colored squares.
#[must_use]
pub fn feedback_to_emoji(feedback: &[Feedback]) -> String {
    feedback.iter().map(|f| f.to_emoji()).collect()
}
