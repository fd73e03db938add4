//! TUI (Terminal User Interface) module for Hangman
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # State Machine
//! - `Playing` → `RoundOver` when the round is won, lost or revealed
//! - `RoundOver` → `Playing` on a new game
//! - `ConfirmingReset` can be entered from either state and returns to it

use crate::game_state::{GameInterface, Message, MessageKind, UserAction};
use crate::round::{Outcome, Round};
use crate::stats::Stats;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const KEYBOARD_ROW_LEN: usize = 13;
const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const HINT_STYLE: Style = Style::new().fg(Color::Cyan);

const KEY_UNUSED: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
const KEY_HIT: Style = Style::new().fg(Color::Black).bg(Color::Green);
const KEY_MISS: Style = Style::new().fg(Color::White).bg(Color::Red);
const SLOT_HIDDEN: Style = Style::new().fg(Color::Gray).bg(Color::DarkGray);
const SLOT_SHOWN: Style = Style::new().fg(Color::Black).bg(Color::White);
const SLOT_MISSED: Style = Style::new().fg(Color::White).bg(Color::Red);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    Playing,
    RoundOver,
    ConfirmingReset { round_over: bool },
}

impl TuiState {
    fn for_outcome(outcome: Outcome) -> Self {
        if outcome.is_terminal() {
            Self::RoundOver
        } else {
            Self::Playing
        }
    }
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key press to an action and the next UI state.
fn map_key(state: TuiState, key: &KeyEvent) -> (Option<UserAction>, TuiState) {
    if key.code == KeyCode::Esc {
        return (Some(UserAction::Exit), state);
    }
    match state {
        TuiState::ConfirmingReset { round_over } => {
            let back = if round_over {
                TuiState::RoundOver
            } else {
                TuiState::Playing
            };
            match key.code {
                KeyCode::Char('y' | 'Y') => (Some(UserAction::ResetStats), back),
                _ => (None, back),
            }
        }
        TuiState::Playing | TuiState::RoundOver => match key.code {
            KeyCode::F(1) => (Some(UserAction::RevealHint), state),
            KeyCode::F(2) => (Some(UserAction::NewGame), state),
            KeyCode::F(3) => (Some(UserAction::Forfeit), state),
            KeyCode::F(4) => (
                None,
                TuiState::ConfirmingReset {
                    round_over: state == TuiState::RoundOver,
                },
            ),
            KeyCode::Enter | KeyCode::Char('n' | 'N') if state == TuiState::RoundOver => {
                (Some(UserAction::NewGame), state)
            }
            KeyCode::Char(c) if !has_modifier_keys(key) => {
                (Some(UserAction::Guess(c.to_string())), state)
            }
            _ => (None, state),
        },
    }
}

fn letter_style(round: &Round, letter: char) -> Style {
    if !round.has_guessed(letter) {
        KEY_UNUSED
    } else if round.contains(letter) {
        KEY_HIT
    } else {
        KEY_MISS
    }
}

fn keyboard_lines(round: &Round) -> Vec<Line<'static>> {
    let letters: Vec<char> = ALPHABET.chars().collect();
    letters
        .chunks(KEYBOARD_ROW_LEN)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|&c| {
                    [
                        Span::styled(format!(" {c} "), letter_style(round, c)),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn word_line(round: &Round) -> Line<'static> {
    // Letters forced open by a loss are shown in the miss colour.
    let lost = round.outcome() == Outcome::Lost;
    let spans: Vec<Span> = round
        .slots()
        .iter()
        .zip(round.word().chars())
        .flat_map(|(slot, c)| {
            let span = match slot {
                Some(_) if lost && !round.has_guessed(c) => {
                    Span::styled(format!(" {c} "), SLOT_MISSED)
                }
                Some(_) => Span::styled(format!(" {c} "), SLOT_SHOWN),
                None => Span::styled("   ".to_string(), SLOT_HIDDEN),
            };
            [span, Span::raw(" ")]
        })
        .collect();
    Line::from(spans)
}

fn message_style(kind: MessageKind) -> Style {
    match kind {
        MessageKind::Success => SUCCESS_STYLE,
        MessageKind::Error => ERROR_STYLE,
        MessageKind::Info => INFO_STYLE,
    }
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: TuiState,
    round: Option<Round>,
    hint: Option<String>,
    message: Option<Message>,
    stats: Stats,
    win_rate: u64,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            state: TuiState::Playing,
            round: None,
            hint: None,
            message: None,
            stats: Stats::default(),
            win_rate: 0,
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

    fn draw(&mut self) -> Result<(), io::Error> {
        let state = self.state;
        let round = self.round.as_ref();
        let hint = self.hint.as_deref();
        let message = self.message.as_ref();
        let stats = self.stats;
        let win_rate = self.win_rate;

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Title
                    Constraint::Length(3), // Word
                    Constraint::Length(3), // Wrong guesses
                    Constraint::Length(4), // Keyboard
                    Constraint::Min(4),    // Messages and hint
                    Constraint::Length(3), // Stats
                    Constraint::Length(3), // Instructions
                ])
                .split(f.area());

            Self::render_title(f, chunks[0]);
            if let Some(round) = round {
                Self::render_word(f, chunks[1], round);
                Self::render_misses(f, chunks[2], round);
                Self::render_keyboard(f, chunks[3], round);
            }
            Self::render_info(f, chunks[4], message, hint);
            Self::render_stats(f, chunks[5], &stats, win_rate);
            Self::render_instructions(f, chunks[6], state);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("HANGMAN")
            .style(HEADER_STYLE)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_word(f: &mut Frame, area: Rect, round: &Round) {
        let title = format!("Word ({} letters)", round.slots().len());
        let paragraph = Paragraph::new(word_line(round))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_misses(f: &mut Frame, area: Rect, round: &Round) {
        let ratio = f64::from(round.misses()) / f64::from(round.max_misses().max(1));
        let color = if round.misses_left() <= 1 {
            Color::Red
        } else {
            Color::Yellow
        };
        let gauge = Gauge::default()
            .block(Block::default().title("Wrong guesses").borders(Borders::ALL))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{} / {}", round.misses(), round.max_misses()));
        f.render_widget(gauge, area);
    }

    fn render_keyboard(f: &mut Frame, area: Rect, round: &Round) {
        let paragraph = Paragraph::new(keyboard_lines(round))
            .alignment(Alignment::Center)
            .block(Block::default().title("Letters").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, message: Option<&Message>, hint: Option<&str>) {
        let mut lines = Vec::new();

        if let Some(message) = message {
            lines.push(Line::from(vec![Span::styled(
                message.text.clone(),
                message_style(message.kind),
            )]));
            lines.push(Line::from(""));
        }

        if let Some(hint) = hint {
            lines.push(Line::from(vec![
                Span::styled("Hint: ", HEADER_STYLE),
                Span::styled(hint.to_string(), HINT_STYLE),
            ]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_stats(f: &mut Frame, area: Rect, stats: &Stats, win_rate: u64) {
        let text = format!(
            "Played: {}   Won: {}   Lost: {}   Win rate: {}%",
            stats.played, stats.won, stats.lost, win_rate
        );
        let paragraph = Paragraph::new(text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Statistics"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Playing => {
                "Type a letter to guess | F1: Hint | F2: New game | F3: Reveal word | F4: Reset stats | ESC: Quit"
            }
            TuiState::RoundOver => "N/ENTER: New game | F4: Reset stats | ESC: Quit",
            TuiState::ConfirmingReset { .. } => {
                "Reset all statistics? This cannot be undone. Y: Yes | any other key: No"
            }
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let event = event::read()?;
        let Event::Key(key) = event else {
            debug_log!("handle_input() - Ignoring non-key event: {:?}", event);
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Alt-tab can leave replacement or control characters behind
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        let previous = self.state;
        let (action, next) = map_key(previous, &key);
        self.state = next;
        if matches!(previous, TuiState::ConfirmingReset { .. }) && action.is_none() {
            self.message = Some(Message::info("Reset cancelled."));
        }
        debug_log!(
            "handle_input() - key={:?} state={:?} -> {:?}, action={:?}",
            key.code,
            previous,
            next,
            action
        );
        Ok(action)
    }
}

impl GameInterface for TuiInterface {
    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(_e) => {
                    info_log!("read_action() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_round(&mut self, round: &Round, hint: Option<&str>) {
        if !matches!(self.state, TuiState::ConfirmingReset { .. }) {
            self.state = TuiState::for_outcome(round.outcome());
        }
        self.round = Some(round.clone());
        self.hint = hint.map(str::to_string);
        self.draw_or_log();
    }

    fn display_message(&mut self, message: &Message) {
        self.message = Some(message.clone());
    }

    fn display_stats(&mut self, stats: &Stats, win_rate: u64) {
        self.stats = *stats;
        self.win_rate = win_rate;
    }

    fn display_exit_message(&mut self) {
        self.message = Some(Message::info("Exiting..."));
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_become_guesses_while_playing() {
        let (action, next) = map_key(TuiState::Playing, &press(KeyCode::Char('e')));
        assert_eq!(action, Some(UserAction::Guess("e".to_string())));
        assert_eq!(next, TuiState::Playing);

        // Non-letters go to the engine too, which rejects them with a message.
        let (action, _) = map_key(TuiState::Playing, &press(KeyCode::Char('7')));
        assert_eq!(action, Some(UserAction::Guess("7".to_string())));
    }

    #[test]
    fn test_modified_keys_are_ignored() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(TuiState::Playing, &key), (None, TuiState::Playing));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(
            map_key(TuiState::Playing, &press(KeyCode::F(1))).0,
            Some(UserAction::RevealHint)
        );
        assert_eq!(
            map_key(TuiState::Playing, &press(KeyCode::F(2))).0,
            Some(UserAction::NewGame)
        );
        assert_eq!(
            map_key(TuiState::Playing, &press(KeyCode::F(3))).0,
            Some(UserAction::Forfeit)
        );
        assert_eq!(
            map_key(TuiState::Playing, &press(KeyCode::Esc)).0,
            Some(UserAction::Exit)
        );
    }

    #[test]
    fn test_new_game_keys_after_round_over() {
        for code in [KeyCode::Char('n'), KeyCode::Char('N'), KeyCode::Enter] {
            assert_eq!(
                map_key(TuiState::RoundOver, &press(code)),
                (Some(UserAction::NewGame), TuiState::RoundOver)
            );
        }
        // While playing, N is just a guess.
        assert_eq!(
            map_key(TuiState::Playing, &press(KeyCode::Char('n'))).0,
            Some(UserAction::Guess("n".to_string()))
        );
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (action, next) = map_key(TuiState::Playing, &press(KeyCode::F(4)));
        assert_eq!(action, None);
        assert_eq!(next, TuiState::ConfirmingReset { round_over: false });

        assert_eq!(
            map_key(next, &press(KeyCode::Char('y'))),
            (Some(UserAction::ResetStats), TuiState::Playing)
        );
        assert_eq!(
            map_key(next, &press(KeyCode::Char('q'))),
            (None, TuiState::Playing)
        );

        let (_, next) = map_key(TuiState::RoundOver, &press(KeyCode::F(4)));
        assert_eq!(
            map_key(next, &press(KeyCode::Enter)),
            (None, TuiState::RoundOver)
        );
    }

    #[test]
    fn test_letter_styles_follow_guesses() {
        let mut round = Round::new("CAT", 6);
        round.submit_guess("C").unwrap();
        round.submit_guess("Z").unwrap();
        assert_eq!(letter_style(&round, 'C'), KEY_HIT);
        assert_eq!(letter_style(&round, 'Z'), KEY_MISS);
        assert_eq!(letter_style(&round, 'Q'), KEY_UNUSED);
    }

    #[test]
    fn test_keyboard_has_every_letter() {
        let round = Round::new("CAT", 6);
        let lines = keyboard_lines(&round);
        assert_eq!(lines.len(), 2);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for c in ALPHABET.chars() {
            assert!(text.contains(c));
        }
    }

    #[test]
    fn test_word_line_hides_unrevealed_slots() {
        let mut round = Round::new("CAT", 6);
        round.submit_guess("A").unwrap();
        let text: String = word_line(&round)
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(text.trim(), "A");
        assert_eq!(text.len(), 12);
    }

    #[test]
    fn test_state_for_outcome() {
        assert_eq!(TuiState::for_outcome(Outcome::InProgress), TuiState::Playing);
        assert_eq!(TuiState::for_outcome(Outcome::Won), TuiState::RoundOver);
        assert_eq!(TuiState::for_outcome(Outcome::Lost), TuiState::RoundOver);
    }
}
