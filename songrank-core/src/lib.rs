/// songrank-core: Pure-computation pairwise ranking engine.
///
/// Pairwise answers → binary-insertion placement → best-first list.
/// No IO, no storage, no rendering: the caller supplies the items, asks a
/// human each pending comparison, and feeds the answer back.
///
/// Items carry a stable `id`; songs coming from different sources are
/// matched with the identity rule (id, else normalized title + artist, with
/// album as an optional disambiguator).
///
/// # Quick start
///
/// ```rust
/// use songrank_core::{ComparisonAnswer, Item, Ranker};
///
/// let items = vec![
///     Item::new("1", "Song1", "Artist"),
///     Item::new("2", "Song2", "Artist"),
///     Item::new("3", "Song3", "Artist"),
/// ];
///
/// let mut ranker = Ranker::new(items);
/// while let Some(pending) = ranker.pending().cloned() {
///     // Ask a human. Here: lower ids are better.
///     let answer = if pending.new_item.id < pending.probe_item.id {
///         ComparisonAnswer::Better
///     } else {
///         ComparisonAnswer::Worse
///     };
///     ranker.submit_answer(&pending, answer).unwrap();
/// }
///
/// let ids: Vec<&str> = ranker.ranked().iter().map(|i| i.id.as_str()).collect();
/// assert_eq!(ids, ["1", "2", "3"]);
/// ```

pub mod constants;
pub mod diff;
pub mod error;
pub mod identity;
pub mod merge;
pub mod ranker;
pub mod types;

// Re-export primary public API at crate root.
pub use diff::{compare_rankings, DiffResult, Direction, SharedItem};
pub use error::{RankError, Result};
pub use identity::{same_song, IdentityIndex};
pub use merge::{
    dedupe_pool, items_from_records, partition_for_extension, validate_snapshot, CatalogTrack,
    Extension, SongRecord, StoredSongRow,
};
pub use ranker::{submit_answer, Ranker};
pub use types::{ComparisonAnswer, ComparisonKind, DraftSnapshot, Item, PendingComparison, RankingState};
