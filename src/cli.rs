use crate::game_state::{GameInterface, Message, MessageKind, UserAction};
use crate::round::{DEFAULT_MAX_MISSES, Outcome, Round};
use crate::stats::Stats;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Hangman: guess the hidden word one letter at a time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a word catalog file (one WORD|hint pair per line)
    #[arg(short = 'i', long = "input")]
    pub catalog_path: Option<PathBuf>,

    /// Where to keep win/loss statistics
    #[arg(long = "stats-file", conflicts_with = "no_stats")]
    pub stats_path: Option<PathBuf>,

    /// Keep statistics in memory only
    #[arg(long)]
    pub no_stats: bool,

    /// Number of wrong guesses that loses a round
    #[arg(long, default_value_t = DEFAULT_MAX_MISSES, value_parser = clap::value_parser!(u32).range(1..=26))]
    pub max_misses: u32,

    /// Seed for word selection, for a repeatable word order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the line-based console instead of the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Write logs to this file
    #[arg(long = "log-file")]
    pub log_path: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

fn parse_command(input: &str) -> UserAction {
    match input.to_uppercase().as_str() {
        "EXIT" | "QUIT" => UserAction::Exit,
        "NEW" | "NEXT" => UserAction::NewGame,
        "REVEAL" => UserAction::Forfeit,
        "HINT" => UserAction::RevealHint,
        "RESET" => UserAction::ResetStats,
        _ => UserAction::Guess(input.to_string()),
    }
}

fn spaced(mask: &str) -> String {
    mask.chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_round(round: &Round, hint: Option<&str>) {
    println!("\nWord: {}", spaced(&round.mask()));
    let guessed: String = round.guessed_letters().iter().collect();
    println!(
        "Guessed: {}",
        if guessed.is_empty() { "-".to_string() } else { spaced(&guessed) }
    );
    println!("Wrong guesses: {}/{}", round.misses(), round.max_misses());
    if let Some(hint) = hint {
        println!("Hint: {hint}");
    }
    match round.outcome() {
        Outcome::InProgress => {}
        Outcome::Won | Outcome::Lost => println!("Type 'new' to play again."),
    }
}

pub fn display_message(message: &Message) {
    let prefix = match message.kind {
        MessageKind::Success => "+",
        MessageKind::Error => "!",
        MessageKind::Info => "*",
    };
    println!("{prefix} {}", message.text);
}

pub fn display_stats(stats: &Stats, win_rate: u64) {
    println!(
        "Played: {} | Won: {} | Lost: {} | Win rate: {}%",
        stats.played, stats.won, stats.lost, win_rate
    );
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// Line-based implementation of `GameInterface` over any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn read_action(&mut self) -> Option<UserAction> {
        println!("\nEnter a letter ('hint', 'reveal', 'new', 'reset' or 'exit'):");
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(parse_command(input.trim())),
            Err(e) => {
                log::warn!("Failed to read input: {}", e);
                None
            }
        }
    }

    fn display_round(&mut self, round: &Round, hint: Option<&str>) {
        display_round(round, hint);
    }

    fn display_message(&mut self, message: &Message) {
        display_message(message);
    }

    fn display_stats(&mut self, stats: &Stats, win_rate: u64) {
        display_stats(stats, win_rate);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
