//! TUI (Terminal User Interface) front-end built on Ratatui.
//!
//! # Layout
//! Title, the guess board, the on-screen keyboard colored by the best
//! feedback seen per letter, a statistics panel, a status line and the key
//! help line.
//!
//! Input is polled with a short timeout so the game loop can keep checking
//! on the background word-list load between key presses.

use crate::error::GameError;
use crate::evaluator::{Feedback, WORD_LENGTH};
use crate::game::{EventOutcome, Game, GameEvent, GameInterface, UserAction};
use crate::game_state::{GameSession, GameStatus};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

/// Background and foreground for a cell.
fn cell_colors(feedback: Option<Feedback>) -> (Color, Color) {
    match feedback {
        None => (Color::DarkGray, Color::White),
        Some(Feedback::Correct) => (Color::Green, Color::Black),
        Some(Feedback::Present) => (Color::Yellow, Color::Black),
        Some(Feedback::Absent) => (Color::Gray, Color::White),
    }
}

/// Full-screen implementation of [`GameInterface`].
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            message: String::new(),
            error_message: String::new(),
            status: "Loading word list...".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self, game: &Game) -> Result<(), io::Error> {
        let message = &self.message;
        let error_message = &self.error_message;
        let status = &self.status;
        self.terminal.draw(|f| {
            Self::render(f, game, message, error_message, status);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self, game: &Game) {
        if let Err(e) = self.draw(game) {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render(f: &mut Frame, game: &Game, message: &str, error_message: &str, status: &str) {
        // Rows past the bottom of the screen are clipped, so the height saturates
        let board_height = u16::try_from(game.max_attempts())
            .unwrap_or(u16::MAX)
            .saturating_mul(ROW_SPACING)
            .saturating_add(2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),            // Title
                Constraint::Length(board_height), // Board
                Constraint::Length(5),            // Keyboard
                Constraint::Min(6),               // Stats and messages
                Constraint::Length(3),            // Status line
                Constraint::Length(3),            // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        match game.session() {
            Some(session) => {
                Self::render_board(f, chunks[1], session, !error_message.is_empty());
                Self::render_keyboard(f, chunks[2], &session.letter_states());
            }
            None => {
                let loading = Paragraph::new("Loading word list...")
                    .style(INFO_STYLE)
                    .block(Block::default().title("Guesses").borders(Borders::ALL));
                f.render_widget(loading, chunks[1]);
                Self::render_keyboard(f, chunks[2], &BTreeMap::new());
            }
        }
        Self::render_info(f, chunks[3], game, message, error_message);
        Self::render_status(f, chunks[4], status);
        Self::render_instructions(f, chunks[5], game);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("TERMO")
            .style(HEADER_STYLE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    /// Completed rows in color, the row being typed, then empty rows.
    /// `shake` paints the typed row red after a rejected submit.
    fn render_board(f: &mut Frame, area: Rect, session: &GameSession, shake: bool) {
        let block = Block::default().title("Guesses").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        for row_index in 0..session.max_attempts() {
            let Some(y) = u16::try_from(row_index)
                .ok()
                .and_then(|row| row.checked_mul(ROW_SPACING))
                .and_then(|offset| inner.y.checked_add(offset))
                .filter(|y| *y < inner.bottom())
            else {
                break;
            };

            let rows = session.rows();
            let cells: Vec<(char, Option<Feedback>)> = if let Some(row) = rows.get(row_index) {
                row.word
                    .chars()
                    .zip(row.feedback)
                    .map(|(letter, feedback)| (letter, Some(feedback)))
                    .collect()
            } else if row_index == session.rows().len() && !session.is_terminal() {
                let mut typed: Vec<char> = session.input().chars().collect();
                typed.resize(WORD_LENGTH, ' ');
                typed.into_iter().map(|letter| (letter, None)).collect()
            } else {
                vec![(' ', None); WORD_LENGTH]
            };

            let is_typing_row = row_index == session.rows().len() && !session.is_terminal();
            let mut spans = vec![Span::raw("  ")];
            for (letter, feedback) in cells {
                let (bg_color, fg_color) = if shake && is_typing_row {
                    (Color::Red, Color::White)
                } else {
                    cell_colors(feedback)
                };
                spans.push(Span::styled(
                    format!(" {letter} "),
                    Style::default().fg(fg_color).bg(bg_color),
                ));
                spans.push(Span::raw(" "));
            }

            Self::render_line(f, inner, y, spans);
        }
    }

    fn render_keyboard(f: &mut Frame, area: Rect, states: &BTreeMap<char, Feedback>) {
        let lines: Vec<Line> = KEYBOARD_ROWS
            .iter()
            .map(|keys| {
                let spans: Vec<Span> = keys
                    .chars()
                    .flat_map(|key| {
                        let (bg_color, fg_color) = cell_colors(states.get(&key).copied());
                        [
                            Span::styled(
                                format!(" {key} "),
                                Style::default().fg(fg_color).bg(bg_color),
                            ),
                            Span::raw(" "),
                        ]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Keyboard").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_line(f: &mut Frame, area: Rect, y: u16, spans: Vec<Span>) {
        if y >= area.y + area.height {
            return;
        }
        let paragraph = Paragraph::new(Line::from(spans));
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    fn render_info(f: &mut Frame, area: Rect, game: &Game, message: &str, error_message: &str) {
        let stats = game.stats();
        let mut lines = vec![
            Line::from(vec![Span::styled("Statistics", HEADER_STYLE)]),
            Line::from(format!(
                "  Played: {}   Won: {} ({:.0}%)   Streak: {}   Best: {}",
                stats.games_played,
                stats.games_won,
                stats.win_rate() * 100.0,
                stats.current_streak,
                stats.best_streak
            )),
        ];
        if !stats.recent_outcomes.is_empty() {
            lines.push(Line::from(format!(
                "  Recent: {}",
                stats.recent_outcomes.join(", ")
            )));
        }
        lines.push(Line::from(""));

        if !message.is_empty() {
            let style = match game.session().map(GameSession::status) {
                Some(GameStatus::Won) => SUCCESS_STYLE,
                _ => MESSAGE_STYLE,
            };
            lines.push(Line::from(vec![Span::styled(message, style)]));
        }
        if !error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, game: &Game) {
        let text = match game.session() {
            None => "Please wait | ESC: Quit",
            Some(session) if session.is_terminal() => "ENTER: Play again | ESC: Quit",
            Some(_) => {
                "Type letters | BACKSPACE: Delete | ENTER: Submit | CTRL-N: New word | ESC: Quit"
            }
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self, game: &Game) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        // Mouse, focus, paste and resize events only trigger a redraw
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        debug_log!(
            "handle_input() - Key event received: code={:?}, modifiers={:?}",
            key.code,
            key.modifiers
        );
        Ok(self.map_key(key, game))
    }

    fn map_key(&mut self, key: KeyEvent, game: &Game) -> Option<UserAction> {
        let terminal = game.session().is_some_and(GameSession::is_terminal);
        let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => Some(UserAction::Exit),
            KeyCode::Char('c') if has_ctrl => Some(UserAction::Exit),
            KeyCode::Char('n') if has_ctrl => Some(UserAction::NewGame),
            KeyCode::Enter if terminal => Some(UserAction::Input(GameEvent::Restart)),
            KeyCode::Enter => Some(UserAction::Input(GameEvent::Submit)),
            KeyCode::Backspace => Some(UserAction::Input(GameEvent::Delete)),
            KeyCode::Char(c) if c.is_alphabetic() && !has_ctrl && !has_alt => {
                Some(UserAction::Input(GameEvent::Letter(c)))
            }
            KeyCode::Char(c) if !has_ctrl && !has_alt => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
                None
            }
            _ => None,
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_loading(&mut self) {
        self.status = "Loading word list...".to_string();
    }

    fn display_new_game(&mut self, game: &Game) {
        self.message = format!(
            "New game! Guess the {WORD_LENGTH}-letter word in {} attempts.",
            game.max_attempts()
        );
        self.error_message.clear();
        self.status = "Enter your first guess".to_string();
        self.draw_or_log(game);
    }

    fn read_action(&mut self, game: &Game) -> Option<UserAction> {
        if self.draw(game).is_err() {
            info_log!("read_action() - Draw failed, returning Exit");
            return Some(UserAction::Exit);
        }
        match self.handle_input(game) {
            Ok(action) => action,
            Err(e) => {
                info_log!("read_action() - Input error: {}", e);
                Some(UserAction::Exit)
            }
        }
    }

    fn display_outcome(&mut self, game: &Game, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Rejected(rejection) => {
                self.error_message = format!("{rejection}!");
            }
            EventOutcome::Evaluated(result) => {
                self.error_message.clear();
                let secret = game
                    .session()
                    .and_then(GameSession::final_word)
                    .unwrap_or_default();
                match result.status {
                    GameStatus::Won => {
                        self.message = format!("You won! The word was {secret}.");
                        self.status = "Game over - press ENTER to play again".to_string();
                    }
                    GameStatus::Lost => {
                        self.message = format!("Out of attempts. The word was {secret}.");
                        self.status = "Game over - press ENTER to play again".to_string();
                    }
                    GameStatus::Active => {
                        let remaining = game.session().map_or(0, GameSession::attempts_remaining);
                        self.message = format!("{} - {remaining} attempts left", result.word);
                        self.status = "Enter your next guess".to_string();
                    }
                }
            }
            EventOutcome::Typed(_) | EventOutcome::Deleted => self.error_message.clear(),
            EventOutcome::Ignored | EventOutcome::Restarted => {}
        }
        self.draw_or_log(game);
    }

    fn display_fatal(&mut self, error: &GameError) {
        // The alternate screen is about to go away, so the caller prints it too
        self.error_message = error.to_string();
        self.status = "Cannot start the game".to_string();
    }

    fn display_exit_message(&mut self) {
        self.status = "Exiting...".to_string();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
