/// The identity rule: deciding when two items are the same song.
///
/// Two items match when their ids are equal, or when their normalized
/// `(title, artist)` pairs are equal and their albums do not disagree.
/// An album only disagrees when both sides name one and the normalized
/// names differ; a missing album is never a mismatch.
use std::collections::HashMap;

use crate::types::Item;

/// Lowercase, trim, and collapse inner whitespace runs to a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn metadata_key(item: &Item) -> (String, String) {
    (normalize(&item.title), normalize(&item.artist))
}

fn album_of(item: &Item) -> Option<String> {
    item.album_title
        .as_deref()
        .map(normalize)
        .filter(|a| !a.is_empty())
}

fn albums_compatible(a: &Item, b: &Item) -> bool {
    match (album_of(a), album_of(b)) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

/// Whether two items represent the same underlying song.
pub fn same_song(a: &Item, b: &Item) -> bool {
    if !a.id.is_empty() && a.id == b.id {
        return true;
    }
    metadata_key(a) == metadata_key(b) && albums_compatible(a, b)
}

/// An item recorded in an [`IdentityIndex`] with its 1-based rank.
#[derive(Debug, Clone, Copy)]
pub struct IndexedItem<'a> {
    pub item: &'a Item,
    pub rank: usize,
}

/// Lookup structure applying the identity rule without pairwise scans.
///
/// Entries keep first-insertion order. Inserting a song that is already
/// present overwrites the recorded item and rank instead of adding a second
/// entry.
#[derive(Debug, Default)]
pub struct IdentityIndex<'a> {
    entries: Vec<IndexedItem<'a>>,
    by_id: HashMap<&'a str, usize>,
    by_metadata: HashMap<(String, String), Vec<usize>>,
}

impl<'a> IdentityIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a best-first ordering, recording 1-based ranks.
    pub fn from_ranking(items: &'a [Item]) -> Self {
        let mut index = Self::new();
        for (i, item) in items.iter().enumerate() {
            index.insert(item, i + 1);
        }
        index
    }

    /// Position of the entry matching `item`, if any.
    pub fn find(&self, item: &Item) -> Option<usize> {
        if !item.id.is_empty() {
            if let Some(&idx) = self.by_id.get(item.id.as_str()) {
                return Some(idx);
            }
        }
        self.by_metadata
            .get(&metadata_key(item))?
            .iter()
            .copied()
            .find(|&idx| albums_compatible(self.entries[idx].item, item))
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.find(item).is_some()
    }

    /// Record `item` at `rank`. Returns the previously recorded rank when the
    /// song was already present.
    pub fn insert(&mut self, item: &'a Item, rank: usize) -> Option<usize> {
        let key = metadata_key(item);
        let (idx, previous) = match self.find(item) {
            Some(idx) => {
                let old = std::mem::replace(&mut self.entries[idx], IndexedItem { item, rank });
                (idx, Some(old.rank))
            }
            None => {
                self.entries.push(IndexedItem { item, rank });
                (self.entries.len() - 1, None)
            }
        };

        if !item.id.is_empty() {
            self.by_id.insert(item.id.as_str(), idx);
        }
        let bucket = self.by_metadata.entry(key).or_default();
        if !bucket.contains(&idx) {
            bucket.push(idx);
        }
        previous
    }

    pub fn entries(&self) -> &[IndexedItem<'a>] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&IndexedItem<'a>> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
