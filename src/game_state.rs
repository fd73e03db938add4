use crate::catalog::{Catalog, CatalogEntry};
use crate::picker::WordPicker;
use crate::round::{Outcome, Round};
use crate::stats::{Stats, StatsStore, StatsTracker};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// Feedback for the player after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    NewGame,
    Forfeit,
    RevealHint,
    ResetStats,
    Exit,
}

/// Everything a surface needs to draw the game.
pub trait GameInterface {
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_round(&mut self, round: &Round, hint: Option<&str>);
    fn display_message(&mut self, message: &Message);
    fn display_stats(&mut self, stats: &Stats, win_rate: u64);
    fn display_exit_message(&mut self);
}

/// One player's game: the catalog, word history, current round and stats.
pub struct Session<S: StatsStore, R: Rng> {
    catalog: Catalog,
    picker: WordPicker,
    rng: R,
    max_misses: u32,
    entry: CatalogEntry,
    round: Round,
    tracker: StatsTracker<S>,
}

impl<S: StatsStore, R: Rng> Session<S, R> {
    /// Create a session and start its first round. A `max_misses` of 0 is raised to 1.
    pub fn new(catalog: Catalog, tracker: StatsTracker<S>, mut rng: R, max_misses: u32) -> Self {
        let max_misses = max_misses.max(1);
        let mut picker = WordPicker::new();
        let entry = picker.pick(&catalog, &mut rng).clone();
        let round = Round::new(&entry.word, max_misses);
        log::info!("Round started ({} letters)", entry.word.len());
        Self {
            catalog,
            picker,
            rng,
            max_misses,
            entry,
            round,
            tracker,
        }
    }

    pub fn new_round(&mut self) -> Message {
        self.entry = self.picker.pick(&self.catalog, &mut self.rng).clone();
        self.round = Round::new(&self.entry.word, self.max_misses);
        log::info!("Round started ({} letters)", self.entry.word.len());
        Message::info(format!(
            "New game started! The word has {} letters.",
            self.entry.word.len()
        ))
    }

    pub fn guess(&mut self, input: &str) -> Message {
        let report = match self.round.submit_guess(input) {
            Ok(report) => report,
            Err(e) => {
                log::debug!("Rejected guess {:?}: {}", input, e);
                return Message::error(e.to_string());
            }
        };

        match report.finished {
            Some(outcome) => self.finish(outcome),
            None if report.is_hit() => {
                Message::success(format!("Great! \"{}\" is in the word!", report.letter))
            }
            None => Message::error(format!(
                "Sorry, \"{}\" is not in the word.",
                report.letter
            )),
        }
    }

    pub fn forfeit(&mut self) -> Message {
        if !self.round.forfeit() {
            return Message::info("This round is already over.");
        }
        self.tracker.record_outcome(Outcome::Lost);
        log::info!("Round forfeited");
        Message::info(format!("Word revealed: \"{}\"", self.entry.word))
    }

    pub fn reveal_hint(&mut self) -> Message {
        if self.round.reveal_hint() {
            Message::info(format!("Hint: {}", self.entry.hint))
        } else if self.round.outcome().is_terminal() {
            Message::error("Hints are only available during a round.")
        } else {
            Message::error("The hint is already revealed.")
        }
    }

    pub fn reset_stats(&mut self) -> Message {
        self.tracker.reset();
        log::info!("Stats reset");
        Message::success("Statistics have been reset!")
    }

    fn finish(&mut self, outcome: Outcome) -> Message {
        self.tracker.record_outcome(outcome);
        log::info!("Round finished: {:?}", outcome);
        match outcome {
            Outcome::Won => Message::success("YOU WON!"),
            _ => Message::error(format!("YOU LOST! The word was \"{}\"", self.entry.word)),
        }
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// The hint for the current word, once the player has revealed it.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.round
            .hint_revealed()
            .then_some(self.entry.hint.as_str())
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.tracker.stats()
    }

    #[must_use]
    pub fn win_rate(&self) -> u64 {
        self.tracker.win_rate()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn tracker(&self) -> &StatsTracker<S> {
        &self.tracker
    }

    /// Apply one action. Returns `None` for `Exit`.
    pub fn apply(&mut self, action: &UserAction) -> Option<Message> {
        match action {
            UserAction::Guess(input) => Some(self.guess(input)),
            UserAction::NewGame => Some(self.new_round()),
            UserAction::Forfeit => Some(self.forfeit()),
            UserAction::RevealHint => Some(self.reveal_hint()),
            UserAction::ResetStats => Some(self.reset_stats()),
            UserAction::Exit => None,
        }
    }
}

fn render<S: StatsStore, R: Rng, I: GameInterface>(session: &Session<S, R>, interface: &mut I) {
    interface.display_stats(&session.stats(), session.win_rate());
    interface.display_round(session.round(), session.hint());
}

/// Drive `session` with actions from `interface` until the player exits or input ends.
pub fn game_loop<S: StatsStore, R: Rng, I: GameInterface>(
    session: &mut Session<S, R>,
    interface: &mut I,
) {
    render(session, interface);

    while let Some(action) = interface.read_action() {
        log::debug!("Action: {:?}", action);
        let Some(message) = session.apply(&action) else {
            break;
        };
        interface.display_message(&message);
        render(session, interface);
    }

    interface.display_exit_message();
}
