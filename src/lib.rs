// Library interface for hangman
// This allows integration tests to access internal modules

pub mod catalog;
pub mod cli;
pub mod error;
pub mod game_state;
pub mod logging;
pub mod picker;
pub mod round;
pub mod stats;
pub mod tui;

// Re-export commonly used items for easier testing
pub use catalog::{Catalog, CatalogEntry, load_catalog, load_catalog_from_file, load_catalog_from_str};
pub use error::{ConfigError, GuessError};
pub use game_state::{GameInterface, Message, MessageKind, Session, UserAction, game_loop};
pub use picker::{WordPicker, pick_next};
pub use round::{DEFAULT_MAX_MISSES, GuessReport, Outcome, Round};
pub use stats::{FileStatsStore, MemoryStatsStore, Stats, StatsStore, StatsTracker};
