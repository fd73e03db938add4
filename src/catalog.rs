use crate::debug_log;
use crate::error::ConfigError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_CATALOG: &str = include_str!("resources/catalog.txt");

const HINT_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub word: String,
    pub hint: String,
}

/// A non-empty list of catalog entries with unique words.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, word: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.word == word)
    }
}

fn parse_line(line: &str) -> Option<CatalogEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (word, hint) = line.split_once(HINT_SEPARATOR)?;
    let word = word.trim().to_uppercase();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        debug_log!("Skipping catalog line with invalid word: {:?}", line);
        return None;
    }
    Some(CatalogEntry {
        word,
        hint: hint.trim().to_string(),
    })
}

fn push_unique(entries: &mut Vec<CatalogEntry>, seen: &mut HashSet<String>, entry: CatalogEntry) {
    if seen.insert(entry.word.clone()) {
        entries.push(entry);
    } else {
        debug_log!("Skipping duplicate catalog word: {}", entry.word);
    }
}

pub fn load_catalog_from_str(data: &str) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for entry in data.lines().filter_map(parse_line) {
        push_unique(&mut entries, &mut seen, entry);
    }
    entries
}

pub fn load_catalog_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<CatalogEntry>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for line in reader.lines() {
        if let Some(entry) = parse_line(&line?) {
            push_unique(&mut entries, &mut seen, entry);
        }
    }
    Ok(entries)
}

/// Load the catalog from `path`, or the embedded one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, ConfigError> {
    let entries = match path {
        Some(path) => load_catalog_from_file(path).map_err(|source| ConfigError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?,
        None => load_catalog_from_str(EMBEDDED_CATALOG),
    };
    log::info!("Loaded {} catalog words", entries.len());
    Catalog::new(entries)
}
