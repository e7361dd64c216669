/// Merge and resume: getting items into the engine.
///
/// Song records arrive in different shapes depending on where they came
/// from (a catalog lookup, a stored ranking row, or an already canonical
/// `Item`). They are all converted to `Item` here. Extending a ranking drops
/// pooled songs that are already ranked; resuming a draft validates the
/// stored snapshot instead of re-deriving it.
use tracing::debug;

use crate::error::{RankError, Result};
use crate::identity::IdentityIndex;
use crate::types::{ComparisonKind, DraftSnapshot, Item, PendingComparison};

/// Artist credit on a catalog track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogAlbum {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<String>,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub images: Vec<CatalogImage>,
}

/// A track as returned by a music catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogTrack {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<CatalogArtist>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub album: Option<CatalogAlbum>,
}

/// A song as stored in a saved ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoredSongRow {
    #[cfg_attr(feature = "serde", serde(default, alias = "songId"))]
    pub song_id: Option<String>,
    pub title: String,
    pub artist: String,
    #[cfg_attr(feature = "serde", serde(default, alias = "albumTitle", alias = "album"))]
    pub album_title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "coverUrl", alias = "cover_art"))]
    pub cover_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, alias = "albumId"))]
    pub album_id: Option<String>,
    /// 1-based position in the stored ranking. Informational; order is
    /// taken from the sequence the rows arrive in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<usize>,
}

/// Any song record shape the engine accepts.
///
/// Untagged: a canonical `Item` is tried first (it is the only shape with a
/// required `id`), then a stored row, then a catalog track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SongRecord {
    Item(Item),
    Stored(StoredSongRow),
    Catalog(CatalogTrack),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<CatalogTrack> for Item {
    fn from(track: CatalogTrack) -> Self {
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let id = non_empty(track.id).unwrap_or_else(|| Item::fallback_id(&track.name, &artist));

        let (album_title, album_id, cover_url) = match track.album {
            Some(album) => (
                non_empty(Some(album.name)),
                non_empty(album.id),
                album.images.into_iter().next().map(|img| img.url),
            ),
            None => (None, None, None),
        };

        Item {
            id,
            title: track.name,
            artist,
            album_title,
            cover_url,
            album_id,
        }
    }
}

impl From<StoredSongRow> for Item {
    fn from(row: StoredSongRow) -> Self {
        let id = non_empty(row.song_id).unwrap_or_else(|| Item::fallback_id(&row.title, &row.artist));
        Item {
            id,
            title: row.title,
            artist: row.artist,
            album_title: non_empty(row.album_title),
            cover_url: non_empty(row.cover_url),
            album_id: non_empty(row.album_id),
        }
    }
}

impl From<SongRecord> for Item {
    fn from(record: SongRecord) -> Self {
        match record {
            SongRecord::Item(item) => item,
            SongRecord::Stored(row) => row.into(),
            SongRecord::Catalog(track) => track.into(),
        }
    }
}

/// Convert records to items, preserving order.
pub fn items_from_records<R: Into<Item>>(records: impl IntoIterator<Item = R>) -> Vec<Item> {
    records.into_iter().map(Into::into).collect()
}

/// Drop later duplicates (by the identity rule) from a pool of new items.
pub fn dedupe_pool(items: Vec<Item>) -> Vec<Item> {
    let keep: Vec<bool> = {
        let mut seen = IdentityIndex::new();
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if seen.contains(item) {
                    false
                } else {
                    seen.insert(item, i + 1);
                    true
                }
            })
            .collect()
    };

    let before = items.len();
    let deduped: Vec<Item> = items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect();

    if deduped.len() < before {
        debug!(dropped = before - deduped.len(), "duplicate items removed from pool");
    }
    deduped
}

/// New items split against an existing ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extension {
    /// Candidates already present in the existing ranking. Never compared.
    pub already_ranked: Vec<Item>,
    /// Candidates to feed to the engine, in their original order.
    pub to_rank: Vec<Item>,
}

/// Split `candidates` into those already in `existing` and those to rank.
pub fn partition_for_extension(existing: &[Item], candidates: Vec<Item>) -> Extension {
    let index = IdentityIndex::from_ranking(existing);
    let (already_ranked, to_rank): (Vec<Item>, Vec<Item>) =
        candidates.into_iter().partition(|item| index.contains(item));

    if !already_ranked.is_empty() {
        debug!(count = already_ranked.len(), "candidates already ranked, skipping");
    }
    Extension { already_ranked, to_rank }
}

/// Drafts may omit `kind`. Nothing is ranked yet, so the question can only
/// be the seed.
pub(crate) fn infer_kind(ranked: &[Item], pending: &mut PendingComparison) {
    if ranked.is_empty() && pending.kind == ComparisonKind::Insertion {
        debug!(comparison = %pending, "reading kind-less draft question as the seed");
        pending.kind = ComparisonKind::Seed;
    }
}

/// Check that a stored snapshot can be resumed verbatim.
///
/// The pending comparison must be about the head of `remaining`, and its
/// probe must sit inside its bounds and name the item actually stored at
/// that position.
pub fn validate_snapshot(snapshot: &DraftSnapshot) -> Result<()> {
    let Some(pending) = &snapshot.pending_comparison else {
        return Ok(());
    };

    let invalid = |msg: String| Err(RankError::InvalidSnapshot(msg));

    match snapshot.remaining.first() {
        Some(head) if *head == pending.new_item => {}
        Some(head) => {
            return invalid(format!(
                "pending comparison is about {} but the next remaining item is {}",
                pending.new_item.id, head.id
            ))
        }
        None => return invalid("pending comparison present but nothing remains to rank".to_string()),
    }

    match pending.kind {
        ComparisonKind::Seed => {
            if !snapshot.ranked.is_empty() {
                return invalid("seed comparison with a non-empty ranked list".to_string());
            }
            if snapshot.remaining.get(1) != Some(&pending.probe_item) {
                return invalid(format!(
                    "seed comparison probe {} is not the second remaining item",
                    pending.probe_item.id
                ));
            }
        }
        ComparisonKind::Insertion => {
            let len = snapshot.ranked.len();
            if pending.low_bound > pending.high_bound || pending.high_bound >= len {
                return invalid(format!(
                    "bounds [{}, {}] do not fit a ranked list of {}",
                    pending.low_bound, pending.high_bound, len
                ));
            }
            if pending.probe_position < pending.low_bound || pending.probe_position > pending.high_bound {
                return invalid(format!(
                    "probe position {} outside bounds [{}, {}]",
                    pending.probe_position, pending.low_bound, pending.high_bound
                ));
            }
            if snapshot.ranked[pending.probe_position] != pending.probe_item {
                return invalid(format!(
                    "probe {} is not the item ranked at position {}",
                    pending.probe_item.id, pending.probe_position
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PendingComparison, RankingState};

    fn song(id: &str) -> Item {
        Item::new(id, id.to_uppercase(), "Artist")
    }

    #[test]
    fn test_catalog_track_conversion() {
        let track = CatalogTrack {
            id: Some("sp:42".to_string()),
            name: "Under Pressure".to_string(),
            artists: vec![
                CatalogArtist { name: "Queen".to_string() },
                CatalogArtist { name: "David Bowie".to_string() },
            ],
            album: Some(CatalogAlbum {
                id: Some("al:7".to_string()),
                name: "Hot Space".to_string(),
                images: vec![
                    CatalogImage { url: "https://img/640".to_string() },
                    CatalogImage { url: "https://img/64".to_string() },
                ],
            }),
        };
        let item = Item::from(track);
        assert_eq!(item.id, "sp:42");
        assert_eq!(item.artist, "Queen, David Bowie");
        assert_eq!(item.album_title.as_deref(), Some("Hot Space"));
        assert_eq!(item.album_id.as_deref(), Some("al:7"));
        assert_eq!(item.cover_url.as_deref(), Some("https://img/640"));
    }

    #[test]
    fn test_stored_row_without_id_falls_back_to_metadata() {
        let row = StoredSongRow {
            song_id: Some("  ".to_string()),
            title: "Jolene".to_string(),
            artist: "Dolly Parton".to_string(),
            album_title: Some(String::new()),
            cover_url: None,
            album_id: None,
            position: Some(3),
        };
        let item = Item::from(row);
        assert_eq!(item.id, "Jolene - Dolly Parton");
        assert_eq!(item.album_title, None);
    }

    #[test]
    fn test_stored_row_and_catalog_track_are_same_song() {
        let stored = Item::from(StoredSongRow {
            song_id: None,
            title: "Hey Jude".to_string(),
            artist: "The Beatles".to_string(),
            album_title: None,
            cover_url: None,
            album_id: None,
            position: None,
        });
        let fetched = Item::from(CatalogTrack {
            id: Some("sp:1".to_string()),
            name: "hey jude ".to_string(),
            artists: vec![CatalogArtist { name: "the beatles".to_string() }],
            album: None,
        });
        assert!(crate::identity::same_song(&stored, &fetched));
    }

    #[test]
    fn test_dedupe_pool_keeps_first_occurrence() {
        let first = Item::new("a", "Song", "Artist").with_album("One");
        let dup = Item::new("b", "song", "artist");
        let other = song("c");
        let pool = dedupe_pool(vec![first.clone(), dup, other.clone()]);
        assert_eq!(pool, vec![first, other]);
    }

    #[test]
    fn test_partition_for_extension() {
        let existing = vec![song("s1"), song("s2")];
        let s2_again = Item::new("other-id", "S2", "artist");
        let ext = partition_for_extension(&existing, vec![s2_again.clone(), song("s3")]);
        assert_eq!(ext.already_ranked, vec![s2_again]);
        assert_eq!(ext.to_rank, vec![song("s3")]);
    }

    fn insertion(new_item: Item, probe_item: Item, probe: usize, low: usize, high: usize) -> PendingComparison {
        PendingComparison {
            kind: ComparisonKind::Insertion,
            new_item,
            probe_item,
            probe_position: probe,
            low_bound: low,
            high_bound: high,
            probe_index: 0,
        }
    }

    #[test]
    fn test_validate_snapshot_accepts_consistent_draft() {
        let snapshot = RankingState {
            ranked: vec![song("p"), song("q")],
            remaining: vec![song("r")],
            pending_comparison: Some(insertion(song("r"), song("q"), 1, 0, 1)),
            comparison_count: 1,
            skipped: vec![],
        };
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn test_validate_snapshot_rejects_bad_bounds() {
        let snapshot = RankingState {
            ranked: vec![song("p"), song("q")],
            remaining: vec![song("r")],
            pending_comparison: Some(insertion(song("r"), song("q"), 1, 0, 2)),
            comparison_count: 1,
            skipped: vec![],
        };
        assert!(matches!(validate_snapshot(&snapshot), Err(RankError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_validate_snapshot_rejects_wrong_probe_item() {
        let snapshot = RankingState {
            ranked: vec![song("p"), song("q")],
            remaining: vec![song("r")],
            pending_comparison: Some(insertion(song("r"), song("p"), 1, 0, 1)),
            comparison_count: 1,
            skipped: vec![],
        };
        assert!(validate_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_validate_snapshot_rejects_foreign_new_item() {
        let snapshot = RankingState {
            ranked: vec![song("p"), song("q")],
            remaining: vec![song("r"), song("t")],
            pending_comparison: Some(insertion(song("t"), song("q"), 1, 0, 1)),
            comparison_count: 1,
            skipped: vec![],
        };
        assert!(validate_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_validate_snapshot_seed_rules() {
        let ok = RankingState {
            ranked: vec![],
            remaining: vec![song("a"), song("b")],
            pending_comparison: Some(PendingComparison::seed(song("a"), song("b"))),
            ..RankingState::default()
        };
        assert!(validate_snapshot(&ok).is_ok());

        let mut bad = ok.clone();
        bad.ranked.push(song("z"));
        assert!(validate_snapshot(&bad).is_err());
    }
}
