//! The controller front-ends talk to, and the loop that drives it.

use crate::error::{GameError, Rejection};
use crate::game_state::{GameSession, GameStatus, GuessResult};
use crate::stats::{Stats, StatsStore};
use crate::wordbank::{WordLoader, WordStore};
use crate::{debug_log, info_log};

/// Input from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Letter(char),
    Delete,
    Submit,
    /// Start the next game once the current one has ended
    Restart,
}

/// What handling an event or guess did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Typed(char),
    Deleted,
    /// Accepted but had no effect (full row, empty row, finished game)
    Ignored,
    Rejected(Rejection),
    Evaluated(GuessResult),
    Restarted,
}

/// Owns everything one player needs: words, the running session and stats.
///
/// Until a word list is attached the game is loading and refuses all input.
pub struct Game {
    words: Option<WordStore>,
    session: Option<GameSession>,
    stats: StatsStore,
    max_attempts: usize,
}

impl Game {
    /// A game still waiting for its word list.
    pub fn new(stats: StatsStore, max_attempts: usize) -> Self {
        Self {
            words: None,
            session: None,
            stats,
            max_attempts,
        }
    }

    pub fn with_words(
        words: WordStore,
        stats: StatsStore,
        max_attempts: usize,
    ) -> Result<Self, GameError> {
        let mut game = Self::new(stats, max_attempts);
        game.attach_words(words)?;
        Ok(game)
    }

    /// Finish loading: draw the first secret and open the session.
    pub fn attach_words(&mut self, mut words: WordStore) -> Result<(), GameError> {
        let secret = words.pick_secret()?;
        self.session = Some(GameSession::new(secret, self.max_attempts));
        self.words = Some(words);
        info_log!("attach_words() - game ready");
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> &Stats {
        self.stats.stats()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Apply one input event.
    ///
    /// Errors are reserved for conditions that end the program; everything
    /// the player can fix comes back as [`EventOutcome::Rejected`].
    pub fn dispatch(&mut self, event: GameEvent) -> Result<EventOutcome, GameError> {
        debug_log!("dispatch() - {:?}", event);
        let (Some(words), Some(session)) = (self.words.as_ref(), self.session.as_mut()) else {
            return Ok(EventOutcome::Rejected(Rejection::Loading));
        };

        let outcome = match event {
            GameEvent::Letter(letter) => {
                if session.push_letter(letter) {
                    EventOutcome::Typed(letter.to_uppercase().next().unwrap_or(letter))
                } else {
                    EventOutcome::Ignored
                }
            }
            GameEvent::Delete => {
                if session.pop_letter() {
                    EventOutcome::Deleted
                } else {
                    EventOutcome::Ignored
                }
            }
            GameEvent::Submit => match session.submit_input(words.dictionary()) {
                Ok(result) => self.finish_guess(result),
                Err(rejection) => EventOutcome::Rejected(rejection),
            },
            GameEvent::Restart => return self.restart(false),
        };
        Ok(outcome)
    }

    /// Submit a whole word at once.
    pub fn submit_guess(&mut self, word: &str) -> EventOutcome {
        let (Some(words), Some(session)) = (self.words.as_ref(), self.session.as_mut()) else {
            return EventOutcome::Rejected(Rejection::Loading);
        };
        match session.submit_guess(word, words.dictionary()) {
            Ok(result) => self.finish_guess(result),
            Err(rejection) => EventOutcome::Rejected(rejection),
        }
    }

    /// Draw a new secret and start over. Without `force` the current game
    /// must have ended; a forced restart abandons it without touching stats.
    pub fn restart(&mut self, force: bool) -> Result<EventOutcome, GameError> {
        let (Some(words), Some(session)) = (self.words.as_mut(), self.session.as_mut()) else {
            return Ok(EventOutcome::Rejected(Rejection::Loading));
        };
        if !force && !session.is_terminal() {
            return Ok(EventOutcome::Rejected(Rejection::GameInProgress));
        }
        let secret = words.pick_secret()?;
        session.force_reset(secret);
        Ok(EventOutcome::Restarted)
    }

    fn finish_guess(&mut self, result: GuessResult) -> EventOutcome {
        if result.status.is_terminal()
            && let Some(final_word) = self.session.as_ref().and_then(GameSession::final_word)
        {
            let won = result.status == GameStatus::Won;
            let final_word = final_word.to_string();
            info_log!("finish_guess() - game over, won={}", won);
            if let Err(e) = self.stats.record_outcome(won, &final_word) {
                log::error!("Failed to save stats: {e}");
            }
        }
        EventOutcome::Evaluated(result)
    }
}

/// A request read from a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Input(GameEvent),
    Guess(String),
    /// Abandon the current game, if any, and start another
    NewGame,
    Exit,
}

/// Presentation side of the game: reads actions and shows results.
pub trait GameInterface {
    fn display_loading(&mut self);
    fn display_new_game(&mut self, game: &Game);
    /// `None` when nothing happened yet; the loop polls again.
    fn read_action(&mut self, game: &Game) -> Option<UserAction>;
    fn display_outcome(&mut self, game: &Game, outcome: &EventOutcome);
    fn display_fatal(&mut self, error: &GameError);
    fn display_exit_message(&mut self);
}

/// Drive `game` from `interface` until the player exits.
///
/// `loader`, when given, is polled between actions and attached as soon as it
/// finishes; a failed load is reported and returned.
pub fn game_loop<I: GameInterface>(
    game: &mut Game,
    mut loader: Option<WordLoader>,
    interface: &mut I,
) -> Result<(), GameError> {
    if game.is_loading() {
        interface.display_loading();
    } else {
        interface.display_new_game(game);
    }

    loop {
        if let Some(result) = loader.as_ref().and_then(WordLoader::try_finish) {
            loader = None;
            if let Err(e) = result.and_then(|words| game.attach_words(words)) {
                interface.display_fatal(&e);
                return Err(e);
            }
            interface.display_new_game(game);
        }

        let Some(action) = interface.read_action(game) else {
            continue;
        };
        let outcome = match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::Input(event) => game.dispatch(event),
            UserAction::Guess(word) => Ok(game.submit_guess(&word)),
            UserAction::NewGame => game.restart(true),
        };

        match outcome {
            Ok(EventOutcome::Restarted) => interface.display_new_game(game),
            Ok(outcome) => interface.display_outcome(game, &outcome),
            Err(e) => {
                interface.display_fatal(&e);
                return Err(e);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{Feedback, WORD_LENGTH};

    fn words() -> WordStore {
        WordStore::new(
            ["CRANE", "SLATE", "TRACE", "RAISE", "STARE", "BUILT", "PLUMB"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        )
        .with_pool(vec!["CRANE".to_string()])
    }

    fn ready_game(max_attempts: usize) -> Game {
        Game::with_words(words(), StatsStore::in_memory(), max_attempts).unwrap()
    }

    fn type_word(game: &mut Game, word: &str) {
        for letter in word.chars() {
            game.dispatch(GameEvent::Letter(letter)).unwrap();
        }
    }

    #[test]
    fn test_loading_rejects_everything() {
        let mut game = Game::new(StatsStore::in_memory(), 6);
        assert!(game.is_loading());
        for event in [
            GameEvent::Letter('A'),
            GameEvent::Delete,
            GameEvent::Submit,
            GameEvent::Restart,
        ] {
            assert_eq!(
                game.dispatch(event).unwrap(),
                EventOutcome::Rejected(Rejection::Loading)
            );
        }
        assert_eq!(
            game.submit_guess("CRANE"),
            EventOutcome::Rejected(Rejection::Loading)
        );
        assert!(game.session().is_none());
    }

    #[test]
    fn test_attach_words_starts_session() {
        let mut game = Game::new(StatsStore::in_memory(), 6);
        game.attach_words(words()).unwrap();
        assert!(!game.is_loading());
        assert_eq!(game.session().unwrap().secret(), "CRANE");
    }

    #[test]
    fn test_attach_empty_pool_fails() {
        let mut game = Game::new(StatsStore::in_memory(), 6);
        let result = game.attach_words(WordStore::new(Vec::new()));
        assert!(matches!(result, Err(GameError::EmptyPool)));
        assert!(game.is_loading());
    }

    #[test]
    fn test_typing_and_deleting() {
        let mut game = ready_game(6);
        assert_eq!(
            game.dispatch(GameEvent::Letter('t')).unwrap(),
            EventOutcome::Typed('T')
        );
        assert_eq!(
            game.dispatch(GameEvent::Delete).unwrap(),
            EventOutcome::Deleted
        );
        assert_eq!(
            game.dispatch(GameEvent::Delete).unwrap(),
            EventOutcome::Ignored
        );
        assert_eq!(
            game.dispatch(GameEvent::Letter('7')).unwrap(),
            EventOutcome::Ignored
        );
    }

    #[test]
    fn test_submit_partial_row_is_rejected() {
        let mut game = ready_game(6);
        type_word(&mut game, "TRA");
        assert_eq!(
            game.dispatch(GameEvent::Submit).unwrap(),
            EventOutcome::Rejected(Rejection::IncompleteRow)
        );
        assert_eq!(game.session().unwrap().input(), "TRA");
    }

    #[test]
    fn test_submit_typed_row() {
        let mut game = ready_game(6);
        type_word(&mut game, "trace");
        let outcome = game.dispatch(GameEvent::Submit).unwrap();
        let EventOutcome::Evaluated(result) = outcome else {
            panic!("expected evaluation, got {outcome:?}");
        };
        assert_eq!(result.word, "TRACE");
        assert_eq!(result.status, GameStatus::Active);
        assert_eq!(game.session().unwrap().current_row(), 1);
    }

    #[test]
    fn test_win_records_stats() {
        let mut game = ready_game(6);
        game.submit_guess("SLATE");
        let outcome = game.submit_guess("crane");
        assert!(matches!(
            outcome,
            EventOutcome::Evaluated(GuessResult { status: GameStatus::Won, .. })
        ));
        assert_eq!(game.stats().games_played, 1);
        assert_eq!(game.stats().games_won, 1);
        assert_eq!(game.stats().current_streak, 1);
        assert_eq!(game.stats().recent_outcomes, vec!["CRANE"]);
    }

    #[test]
    fn test_loss_records_secret() {
        let mut game = ready_game(2);
        game.submit_guess("SLATE");
        let outcome = game.submit_guess("TRACE");
        let EventOutcome::Evaluated(result) = outcome else {
            panic!("expected evaluation, got {outcome:?}");
        };
        assert_eq!(result.status, GameStatus::Lost);
        assert_eq!(result.feedback.len(), WORD_LENGTH);
        assert_eq!(game.stats().games_played, 1);
        assert_eq!(game.stats().games_won, 0);
        assert_eq!(game.stats().recent_outcomes, vec!["CRANE"]);
    }

    #[test]
    fn test_input_after_game_over() {
        let mut game = ready_game(6);
        game.submit_guess("CRANE");
        assert_eq!(
            game.dispatch(GameEvent::Letter('A')).unwrap(),
            EventOutcome::Ignored
        );
        assert_eq!(
            game.dispatch(GameEvent::Submit).unwrap(),
            EventOutcome::Rejected(Rejection::GameOver)
        );
        assert_eq!(
            game.submit_guess("CRANE"),
            EventOutcome::Rejected(Rejection::GameOver)
        );
        // Stats are recorded once per game
        assert_eq!(game.stats().games_played, 1);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut game = ready_game(6);
        game.submit_guess("SLATE");
        assert_eq!(
            game.dispatch(GameEvent::Restart).unwrap(),
            EventOutcome::Rejected(Rejection::GameInProgress)
        );
        assert_eq!(game.session().unwrap().rows().len(), 1);

        game.submit_guess("CRANE");
        assert_eq!(
            game.dispatch(GameEvent::Restart).unwrap(),
            EventOutcome::Restarted
        );
        let session = game.session().unwrap();
        assert_eq!(session.status(), GameStatus::Active);
        assert!(session.rows().is_empty());
    }

    #[test]
    fn test_forced_restart_skips_stats() {
        let mut game = ready_game(6);
        game.submit_guess("SLATE");
        assert_eq!(game.restart(true).unwrap(), EventOutcome::Restarted);
        assert_eq!(game.stats().games_played, 0);
        assert!(game.session().unwrap().rows().is_empty());
    }

    #[test]
    fn test_keyboard_view_through_game() {
        let mut game = ready_game(6);
        game.submit_guess("TRACE");
        let states = game.session().unwrap().letter_states();
        assert_eq!(states[&'R'], Feedback::Correct);
        assert_eq!(states[&'T'], Feedback::Absent);
    }

    /// Replays a fixed list of actions and records what was shown.
    #[derive(Default)]
    struct ScriptedInterface {
        actions: Vec<UserAction>,
        outcomes: Vec<EventOutcome>,
        new_games: usize,
        loading_shown: bool,
        fatal: Option<String>,
        exited: bool,
    }

    impl ScriptedInterface {
        fn new(actions: Vec<UserAction>) -> Self {
            let mut actions = actions;
            actions.reverse();
            Self {
                actions,
                ..Self::default()
            }
        }
    }

    impl GameInterface for ScriptedInterface {
        fn display_loading(&mut self) {
            self.loading_shown = true;
        }

        fn display_new_game(&mut self, _game: &Game) {
            self.new_games += 1;
        }

        fn read_action(&mut self, game: &Game) -> Option<UserAction> {
            match self.actions.pop() {
                Some(action) => Some(action),
                // Keep polling while the word list is on its way
                None if game.is_loading() => None,
                None => Some(UserAction::Exit),
            }
        }

        fn display_outcome(&mut self, _game: &Game, outcome: &EventOutcome) {
            self.outcomes.push(outcome.clone());
        }

        fn display_fatal(&mut self, error: &GameError) {
            self.fatal = Some(error.to_string());
        }

        fn display_exit_message(&mut self) {
            self.exited = true;
        }
    }

    #[test]
    fn test_game_loop_plays_to_win_and_restarts() {
        let mut game = ready_game(6);
        let mut interface = ScriptedInterface::new(vec![
            UserAction::Guess("ZZZZZ".to_string()),
            UserAction::Guess("SLATE".to_string()),
            UserAction::Guess("CRANE".to_string()),
            UserAction::Input(GameEvent::Restart),
            UserAction::Exit,
        ]);
        game_loop(&mut game, None, &mut interface).unwrap();

        assert!(interface.exited);
        assert_eq!(interface.new_games, 2);
        assert_eq!(interface.outcomes.len(), 3);
        assert_eq!(
            interface.outcomes[0],
            EventOutcome::Rejected(Rejection::NotInDictionary)
        );
        assert_eq!(game.stats().games_won, 1);
    }

    #[test]
    fn test_game_loop_attaches_loader() {
        use crate::wordbank::WordSource;

        let mut game = Game::new(StatsStore::in_memory(), 6);
        let loader = WordLoader::spawn(WordSource {
            seed: Some(3),
            ..WordSource::default()
        });
        let mut interface = ScriptedInterface::new(Vec::new());
        game_loop(&mut game, Some(loader), &mut interface).unwrap();

        assert!(interface.loading_shown);
        assert_eq!(interface.new_games, 1);
        assert!(interface.exited);
        assert!(!game.is_loading());
    }

    #[test]
    fn test_game_loop_reports_failed_load() {
        use crate::wordbank::WordSource;
        use std::path::PathBuf;

        let mut game = Game::new(StatsStore::in_memory(), 6);
        let loader = WordLoader::spawn(WordSource {
            dictionary: Some(PathBuf::from("/definitely/not/here/words.txt")),
            ..WordSource::default()
        });
        let mut interface = ScriptedInterface::new(vec![
            UserAction::Guess("CRANE".to_string()),
            UserAction::Input(GameEvent::Letter('A')),
        ]);
        let result = game_loop(&mut game, Some(loader), &mut interface);

        assert!(interface.loading_shown);
        assert!(interface.fatal.is_some());
        assert!(matches!(result, Err(GameError::Load { .. })));
        // Anything read before the failure was refused as loading
        assert!(!interface.exited);
        assert!(interface
            .outcomes
            .iter()
            .all(|o| *o == EventOutcome::Rejected(Rejection::Loading)));
    }
}
