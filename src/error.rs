use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a guess is rejected. A rejected guess never changes the round.
///
/// The `Display` text is shown to the player as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("Please select a letter!")]
    Empty,
    #[error("Only single letters are allowed! ('{0}' is not a letter)")]
    NotALetter(String),
    #[error("You already guessed \"{0}\"!")]
    AlreadyGuessed(char),
    #[error("This round is over. Start a new game to keep playing.")]
    RoundOver,
}

/// Startup faults. These are fatal: the game cannot run without a catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("word catalog is empty")]
    EmptyCatalog,
    #[error("failed to read word catalog from '{}': {source}", .path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_error_messages() {
        assert_eq!(GuessError::Empty.to_string(), "Please select a letter!");
        assert_eq!(
            GuessError::NotALetter("7".to_string()).to_string(),
            "Only single letters are allowed! ('7' is not a letter)"
        );
        assert_eq!(
            GuessError::AlreadyGuessed('E').to_string(),
            "You already guessed \"E\"!"
        );
    }

    #[test]
    fn test_catalog_read_error_names_path() {
        let err = ConfigError::CatalogRead {
            path: PathBuf::from("/nope/words.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let text = err.to_string();
        assert!(text.contains("/nope/words.txt"));
        assert!(text.contains("not found"));
    }
}
