use crate::catalog::{Catalog, CatalogEntry};
use crate::debug_log;
use rand::Rng;
use std::collections::HashSet;

/// Pick the next entry, never repeating a word until every word has been used.
///
/// When `used` already covers the whole catalog it is cleared first, starting
/// a new rotation. The chosen word is inserted into `used` before returning.
pub fn pick_next<'a, R: Rng>(
    catalog: &'a Catalog,
    used: &mut HashSet<String>,
    rng: &mut R,
) -> &'a CatalogEntry {
    if catalog.entries().iter().all(|e| used.contains(&e.word)) {
        debug_log!("All {} words used, starting a new rotation", catalog.len());
        used.clear();
    }

    let available: Vec<&CatalogEntry> = catalog
        .entries()
        .iter()
        .filter(|e| !used.contains(&e.word))
        .collect();
    // Non-empty: the catalog is non-empty and `used` was cleared if it covered it.
    let selected = available[rng.gen_range(0..available.len())];
    used.insert(selected.word.clone());

    debug_log!(
        "Selected word {} ({} were available)",
        selected.word,
        available.len()
    );
    selected
}

/// Word history for the current rotation.
#[derive(Debug, Default)]
pub struct WordPicker {
    used: HashSet<String>,
}

impl WordPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick<'a, R: Rng>(&mut self, catalog: &'a Catalog, rng: &mut R) -> &'a CatalogEntry {
        pick_next(catalog, &mut self.used, rng)
    }

    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn was_used(&self, word: &str) -> bool {
        self.used.contains(word)
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}
