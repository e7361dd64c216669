use std::fmt;

use crate::constants::FALLBACK_ID_SEPARATOR;

/// One ranked entity (a song).
///
/// Only `id`, `title`, `artist` and `album_title` are ever inspected, and only
/// by the identity rule. The rest is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Item {
    /// Catalog id, or `title - artist` when the source had none.
    pub id: String,
    pub title: String,
    pub artist: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub album_title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub cover_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub album_id: Option<String>,
}

impl Item {
    /// Item with a catalog id and no album metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album_title: None,
            cover_url: None,
            album_id: None,
        }
    }

    /// Item without a catalog id; the id is derived from title and artist.
    pub fn untracked(title: impl Into<String>, artist: impl Into<String>) -> Self {
        let title = title.into();
        let artist = artist.into();
        let id = Self::fallback_id(&title, &artist);
        Item::new(id, title, artist)
    }

    pub fn with_album(mut self, album_title: impl Into<String>) -> Self {
        self.album_title = Some(album_title.into());
        self
    }

    /// `title - artist`, or just the title when there is no artist.
    pub fn fallback_id(title: &str, artist: &str) -> String {
        match artist.trim() {
            "" => title.trim().to_string(),
            artist => format!("{}{}{}", title.trim(), FALLBACK_ID_SEPARATOR, artist),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

/// A caller's verdict on the pending comparison, from the new item's
/// point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ComparisonAnswer {
    /// The new item ranks above the probe.
    Better,
    /// The new item ranks below the probe.
    Worse,
    /// No judgement. The new item is dropped from this run.
    Unknown,
}

/// What kind of question a pending comparison is.
///
/// Drafts written without a `kind` load as `Insertion`; a draft whose
/// `ranked` list is still empty can only be waiting on the seed, and is
/// read as one on resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ComparisonKind {
    /// The first question of a run started without an existing order.
    /// Bounds and probe position are meaningless (always 0).
    Seed,
    /// One step of the binary search placing `new_item` into `ranked`.
    #[default]
    Insertion,
}

/// The question the engine is waiting on.
///
/// Carries its own search bounds: the engine never re-derives them from
/// `ranked`, so the caller must hand back exactly the value it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PendingComparison {
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ComparisonKind,
    pub new_item: Item,
    pub probe_item: Item,
    /// Index of `probe_item` in `ranked`.
    pub probe_position: usize,
    /// Inclusive search bounds over `ranked`.
    pub low_bound: usize,
    pub high_bound: usize,
    /// Probes already spent on `new_item` before this one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub probe_index: u32,
}

impl PendingComparison {
    pub(crate) fn seed(first: Item, second: Item) -> Self {
        PendingComparison {
            kind: ComparisonKind::Seed,
            new_item: first,
            probe_item: second,
            probe_position: 0,
            low_bound: 0,
            high_bound: 0,
            probe_index: 0,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.kind == ComparisonKind::Seed
    }
}

impl fmt::Display for PendingComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ComparisonKind::Seed => write!(f, "seed: {} vs {}", self.new_item.id, self.probe_item.id),
            ComparisonKind::Insertion => write!(
                f,
                "{} vs {} at {} in [{}, {}]",
                self.new_item.id, self.probe_item.id, self.probe_position, self.low_bound, self.high_bound,
            ),
        }
    }
}

/// The engine's externally observable snapshot. Doubles as the persisted
/// draft: every field is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RankingState {
    /// Placed items, best first.
    pub ranked: Vec<Item>,
    /// Items not yet placed. The item under comparison is always first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub remaining: Vec<Item>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pending_comparison: Option<PendingComparison>,
    /// Decisive (`Better`/`Worse`) answers consumed so far.
    #[cfg_attr(feature = "serde", serde(default))]
    pub comparison_count: usize,
    /// Items dropped by an `Unknown` answer, in the order they were dropped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skipped: Vec<Item>,
}

/// A persisted, not yet complete `RankingState`.
pub type DraftSnapshot = RankingState;

impl RankingState {
    /// True once nothing is left to place.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty() && self.pending_comparison.is_none()
    }

    /// Total items this run started with, placed or not.
    pub fn total_items(&self) -> usize {
        self.ranked.len() + self.remaining.len() + self.skipped.len()
    }
}
