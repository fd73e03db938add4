//! Win/loss tally and its persistence.
//!
//! Stats are best-effort: a store that cannot be read starts from zero and a
//! failed write is logged and ignored. Nothing here can fail a round.

use crate::round::Outcome;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub const KEY_PLAYED: &str = "hangman_games_played";
pub const KEY_WON: &str = "hangman_games_won";
pub const KEY_LOST: &str = "hangman_games_lost";

const STATS_DIR: &str = "hangman";
const STATS_FILE: &str = "stats.json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub played: u64,
    pub won: u64,
    pub lost: u64,
}

impl Stats {
    /// Count a finished round. In-progress outcomes are ignored.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => self.won = self.won.saturating_add(1),
            Outcome::Lost => self.lost = self.lost.saturating_add(1),
            Outcome::InProgress => {
                log::warn!("Ignoring attempt to record an unfinished round");
                return;
            }
        }
        self.played = self.played.saturating_add(1);
    }

    /// Percentage of rounds won, rounded to the nearest integer (0 when none played).
    ///
    /// Counters come from disk and may be inconsistent, so `won` is capped at
    /// `played` and the result never exceeds 100.
    #[must_use]
    pub fn win_rate(&self) -> u64 {
        if self.played == 0 {
            return 0;
        }
        let played = u128::from(self.played);
        let won = u128::from(self.won.min(self.played));
        // At most 100 after the cap, so the narrowing is lossless.
        ((won * 100 + played / 2) / played) as u64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Key-value storage for the three counters.
pub trait StatsStore {
    fn load(&self, key: &str) -> Option<u64>;
    fn save(&mut self, key: &str, value: u64);

    /// Save several values as one update. Stores backed by a file override
    /// this so the counters are never written out of step with each other.
    fn save_all(&mut self, values: &[(&str, u64)]) {
        for (key, value) in values {
            self.save(key, *value);
        }
    }
}

/// Keeps values in memory only. Used by tests and `--no-stats`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStatsStore {
    values: HashMap<String, u64>,
}

impl MemoryStatsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_values(values: &[(&str, u64)]) -> Self {
        Self {
            values: values.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
        }
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn save(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Stores the counters as a JSON object, e.g. `{"hangman_games_played": 3}`.
#[derive(Debug)]
pub struct FileStatsStore {
    path: PathBuf,
    values: BTreeMap<String, u64>,
}

#[must_use]
pub fn default_stats_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(STATS_DIR).join(STATS_FILE))
}

impl FileStatsStore {
    /// Open the store at `path`. A missing, unreadable or malformed file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, u64>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring malformed stats file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                log::debug!("No stats read from {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        // Write beside the target and rename so a failed write leaves the old file intact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn flush_or_warn(&self) {
        if let Err(e) = self.flush() {
            log::warn!("Failed to save stats to {}: {}", self.path.display(), e);
        }
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn save(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value);
        self.flush_or_warn();
    }

    fn save_all(&mut self, values: &[(&str, u64)]) {
        for (key, value) in values {
            self.values.insert((*key).to_string(), *value);
        }
        self.flush_or_warn();
    }
}

/// In-memory counters backed by a `StatsStore`.
pub struct StatsTracker<S: StatsStore> {
    stats: Stats,
    store: S,
}

impl<S: StatsStore> StatsTracker<S> {
    /// Load the counters from `store`, treating absent keys as zero.
    pub fn new(store: S) -> Self {
        let stats = Stats {
            played: store.load(KEY_PLAYED).unwrap_or(0),
            won: store.load(KEY_WON).unwrap_or(0),
            lost: store.load(KEY_LOST).unwrap_or(0),
        };
        log::info!(
            "Loaded stats: played={} won={} lost={}",
            stats.played,
            stats.won,
            stats.lost
        );
        Self { stats, store }
    }

    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.stats.record(outcome);
        self.persist();
    }

    pub fn reset(&mut self) {
        self.stats.reset();
        self.persist();
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    #[must_use]
    pub fn win_rate(&self) -> u64 {
        self.stats.win_rate()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        self.store.save_all(&[
            (KEY_PLAYED, self.stats.played),
            (KEY_WON, self.stats.won),
            (KEY_LOST, self.stats.lost),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate() {
        assert_eq!(Stats::default().win_rate(), 0);
        let stats = Stats {
            played: 4,
            won: 2,
            lost: 2,
        };
        assert_eq!(stats.win_rate(), 50);
        let stats = Stats {
            played: 3,
            won: 2,
            lost: 1,
        };
        assert_eq!(stats.win_rate(), 67);
        let stats = Stats {
            played: 8,
            won: 1,
            lost: 7,
        };
        assert_eq!(stats.win_rate(), 13);
    }

    #[test]
    fn test_record_counts_played_always() {
        let mut stats = Stats::default();
        stats.record(Outcome::Won);
        stats.record(Outcome::Lost);
        stats.record(Outcome::Lost);
        assert_eq!(
            stats,
            Stats {
                played: 3,
                won: 1,
                lost: 2
            }
        );
    }

    #[test]
    fn test_record_ignores_in_progress() {
        let mut stats = Stats::default();
        stats.record(Outcome::InProgress);
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn test_tracker_loads_and_defaults_missing_keys() {
        let store = MemoryStatsStore::with_values(&[(KEY_PLAYED, 5), (KEY_WON, 3)]);
        let tracker = StatsTracker::new(store);
        assert_eq!(
            tracker.stats(),
            Stats {
                played: 5,
                won: 3,
                lost: 0
            }
        );
        assert_eq!(tracker.win_rate(), 60);
    }

    #[test]
    fn test_tracker_saves_after_each_outcome_and_reset() {
        let mut tracker = StatsTracker::new(MemoryStatsStore::new());
        tracker.record_outcome(Outcome::Won);
        assert_eq!(tracker.store().load(KEY_PLAYED), Some(1));
        assert_eq!(tracker.store().load(KEY_WON), Some(1));
        assert_eq!(tracker.store().load(KEY_LOST), Some(0));

        tracker.record_outcome(Outcome::Lost);
        assert_eq!(tracker.store().load(KEY_LOST), Some(1));

        tracker.reset();
        assert_eq!(tracker.stats(), Stats::default());
        assert_eq!(tracker.store().load(KEY_PLAYED), Some(0));
        assert_eq!(tracker.store().load(KEY_WON), Some(0));
        assert_eq!(tracker.store().load(KEY_LOST), Some(0));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir()
            .join("hangman_stats_unit_test")
            .join("stats.json");
        let _ = fs::remove_file(&path);

        {
            let mut tracker = StatsTracker::new(FileStatsStore::open(&path));
            assert_eq!(tracker.stats(), Stats::default());
            tracker.record_outcome(Outcome::Won);
            tracker.record_outcome(Outcome::Lost);
        }

        let contents = fs::read_to_string(&path).unwrap();
        let on_disk: BTreeMap<String, u64> = serde_json::from_str(&contents).unwrap();
        assert_eq!(on_disk.get(KEY_PLAYED), Some(&2));
        assert_eq!(on_disk.get(KEY_WON), Some(&1));
        assert_eq!(on_disk.get(KEY_LOST), Some(&1));

        let tracker = StatsTracker::new(FileStatsStore::open(&path));
        assert_eq!(
            tracker.stats(),
            Stats {
                played: 2,
                won: 1,
                lost: 1
            }
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_malformed_file_starts_empty() {
        let path = std::env::temp_dir().join("hangman_stats_malformed.json");
        fs::write(&path, "hangman_games_won=4\nnonsense\n").unwrap();
        let tracker = StatsTracker::new(FileStatsStore::open(&path));
        assert_eq!(tracker.stats(), Stats::default());

        fs::write(&path, r#"{"hangman_games_won": -1}"#).unwrap();
        let store = FileStatsStore::open(&path);
        assert_eq!(store.load(KEY_WON), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_huge_stored_counters_do_not_overflow() {
        let path = std::env::temp_dir().join("hangman_stats_huge.json");
        fs::write(
            &path,
            r#"{"hangman_games_played": 18446744073709551615, "hangman_games_won": 1000000000000000000}"#,
        )
        .unwrap();

        let mut tracker = StatsTracker::new(FileStatsStore::open(&path));
        assert_eq!(tracker.stats().played, u64::MAX);
        assert_eq!(tracker.win_rate(), 5);

        tracker.record_outcome(Outcome::Won);
        assert_eq!(tracker.stats().played, u64::MAX);
        assert_eq!(tracker.stats().won, 1_000_000_000_000_000_001);
        assert_eq!(tracker.win_rate(), 5);
        assert_eq!(tracker.store().load(KEY_PLAYED), Some(u64::MAX));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_win_rate_caps_won_at_played() {
        let stats = Stats {
            played: 2,
            won: 5,
            lost: 0,
        };
        assert_eq!(stats.win_rate(), 100);
        let stats = Stats {
            played: u64::MAX,
            won: u64::MAX,
            lost: 0,
        };
        assert_eq!(stats.win_rate(), 100);
    }

    #[test]
    fn test_record_saturates_at_max() {
        let mut stats = Stats {
            played: u64::MAX,
            won: u64::MAX,
            lost: u64::MAX,
        };
        stats.record(Outcome::Won);
        stats.record(Outcome::Lost);
        assert_eq!(stats.played, u64::MAX);
        assert_eq!(stats.won, u64::MAX);
        assert_eq!(stats.lost, u64::MAX);
    }

    /// Counts whole-store writes so a test can check the counters go out together.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStatsStore,
        single_saves: usize,
        batch_saves: usize,
    }

    impl StatsStore for CountingStore {
        fn load(&self, key: &str) -> Option<u64> {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, value: u64) {
            self.single_saves += 1;
            self.inner.save(key, value);
        }

        fn save_all(&mut self, values: &[(&str, u64)]) {
            self.batch_saves += 1;
            for (key, value) in values {
                self.inner.save(key, *value);
            }
        }
    }

    #[test]
    fn test_tracker_writes_all_counters_in_one_update() {
        let mut tracker = StatsTracker::new(CountingStore::default());
        tracker.record_outcome(Outcome::Lost);
        tracker.reset();
        assert_eq!(tracker.store().batch_saves, 2);
        assert_eq!(tracker.store().single_saves, 0);
        assert_eq!(tracker.store().load(KEY_LOST), Some(0));
    }

    #[test]
    fn test_file_store_save_all_writes_once() {
        let path = std::env::temp_dir()
            .join("hangman_stats_save_all")
            .join("stats.json");
        let _ = fs::remove_file(&path);
        let mut store = FileStatsStore::open(&path);
        store.save_all(&[(KEY_PLAYED, 7), (KEY_WON, 4), (KEY_LOST, 3)]);

        let reopened = FileStatsStore::open(&path);
        assert_eq!(reopened.load(KEY_PLAYED), Some(7));
        assert_eq!(reopened.load(KEY_WON), Some(4));
        assert_eq!(reopened.load(KEY_LOST), Some(3));
        assert!(!path.with_extension("json.tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_write_failure_is_not_fatal() {
        // A path under an existing regular file cannot be created.
        let blocker = std::env::temp_dir().join("hangman_stats_blocker");
        fs::write(&blocker, "x").unwrap();
        let mut store = FileStatsStore::open(blocker.join("stats.json"));
        store.save(KEY_PLAYED, 1);
        assert_eq!(store.load(KEY_PLAYED), Some(1));
        let _ = fs::remove_file(&blocker);
    }
}
