//! Round engine: the state of a single game from word selection to win or loss.
//!
//! A round starts `InProgress` and moves to `Won` or `Lost` exactly once.
//! Both terminal states are final; every further guess is rejected.

use crate::error::GuessError;

pub const DEFAULT_MAX_MISSES: u32 = 6;
pub const PLACEHOLDER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// What an accepted guess did to the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub letter: char,
    /// Number of positions revealed; zero means the guess was a miss.
    pub occurrences: usize,
    /// Set only on the guess that ended the round.
    pub finished: Option<Outcome>,
}

impl GuessReport {
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.occurrences > 0
    }
}

#[derive(Debug, Clone)]
pub struct Round {
    word: Vec<char>,
    mask: Vec<Option<char>>,
    guessed: Vec<char>,
    misses: u32,
    max_misses: u32,
    outcome: Outcome,
    hint_revealed: bool,
}

impl Round {
    /// Start a round for `word`. The word must be non-empty uppercase ASCII,
    /// which the catalog guarantees. A `max_misses` of 0 is raised to 1.
    #[must_use]
    pub fn new(word: &str, max_misses: u32) -> Self {
        debug_assert!(
            !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase()),
            "round word must be non-empty uppercase ASCII, got {word:?}"
        );
        let word: Vec<char> = word.chars().collect();
        Self {
            mask: vec![None; word.len()],
            word,
            guessed: Vec::new(),
            misses: 0,
            max_misses: max_misses.max(1),
            outcome: Outcome::InProgress,
            hint_revealed: false,
        }
    }

    /// Normalize raw input to a single uppercase letter.
    fn parse_letter(input: &str) -> Result<char, GuessError> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(GuessError::Empty),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
            _ => Err(GuessError::NotALetter(trimmed.to_string())),
        }
    }

    pub fn submit_guess(&mut self, input: &str) -> Result<GuessReport, GuessError> {
        let letter = Self::parse_letter(input)?;
        if self.guessed.contains(&letter) {
            return Err(GuessError::AlreadyGuessed(letter));
        }
        if self.outcome.is_terminal() {
            return Err(GuessError::RoundOver);
        }

        self.guessed.push(letter);

        let mut occurrences = 0;
        for (slot, &c) in self.mask.iter_mut().zip(&self.word) {
            if c == letter {
                *slot = Some(c);
                occurrences += 1;
            }
        }
        if occurrences == 0 {
            self.misses += 1;
        }

        // Win is checked before loss.
        let finished = if self.mask.iter().all(Option::is_some) {
            Some(self.finish(Outcome::Won))
        } else if self.misses >= self.max_misses {
            Some(self.finish(Outcome::Lost))
        } else {
            None
        };

        Ok(GuessReport {
            letter,
            occurrences,
            finished,
        })
    }

    /// Give up: show the word and mark the round lost. Returns false if the
    /// round had already ended.
    pub fn forfeit(&mut self) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        self.finish(Outcome::Lost);
        true
    }

    /// Mark the hint as shown. Only possible once, while the round is running.
    pub fn reveal_hint(&mut self) -> bool {
        if self.hint_revealed || self.outcome.is_terminal() {
            return false;
        }
        self.hint_revealed = true;
        true
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.outcome = outcome;
        for (slot, &c) in self.mask.iter_mut().zip(&self.word) {
            *slot = Some(c);
        }
        outcome
    }

    #[must_use]
    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<char>] {
        &self.mask
    }

    /// The reveal mask with `PLACEHOLDER` in unrevealed positions.
    #[must_use]
    pub fn mask(&self) -> String {
        self.mask.iter().map(|s| s.unwrap_or(PLACEHOLDER)).collect()
    }

    /// Guessed letters in the order they were first submitted.
    #[must_use]
    pub fn guessed_letters(&self) -> &[char] {
        &self.guessed
    }

    #[must_use]
    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed.contains(&letter.to_ascii_uppercase())
    }

    #[must_use]
    pub fn contains(&self, letter: char) -> bool {
        self.word.contains(&letter.to_ascii_uppercase())
    }

    #[must_use]
    pub fn misses(&self) -> u32 {
        self.misses
    }

    #[must_use]
    pub fn max_misses(&self) -> u32 {
        self.max_misses
    }

    #[must_use]
    pub fn misses_left(&self) -> u32 {
        self.max_misses.saturating_sub(self.misses)
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn hint_revealed(&self) -> bool {
        self.hint_revealed
    }
}
