/// Ranking diff: comparing two completed orderings.
///
/// Side A is "yours", side B is "theirs". Both inputs are best-first.
/// Songs are matched across sides with the identity rule; within one side a
/// later duplicate overwrites the rank recorded for the earlier one.
use std::collections::HashSet;

use crate::identity::IdentityIndex;
use crate::types::Item;

/// Movement of a shared item, read from B's rank minus A's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Direction {
    /// Ranked higher (smaller number) in B.
    Up,
    /// Ranked lower (larger number) in B.
    Down,
    Same,
}

/// An item present on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SharedItem {
    /// The item as it appears in A.
    pub item: Item,
    /// 1-based rank in A.
    pub rank_a: usize,
    /// 1-based rank in B.
    pub rank_b: usize,
    /// `|rank_a - rank_b|`.
    pub diff_amount: usize,
    pub direction: Direction,
}

impl SharedItem {
    fn new(item: Item, rank_a: usize, rank_b: usize) -> Self {
        let direction = match rank_b.cmp(&rank_a) {
            std::cmp::Ordering::Greater => Direction::Down,
            std::cmp::Ordering::Less => Direction::Up,
            std::cmp::Ordering::Equal => Direction::Same,
        };
        SharedItem {
            item,
            rank_a,
            rank_b,
            diff_amount: rank_a.abs_diff(rank_b),
            direction,
        }
    }

    /// `rank_b - rank_a`: positive when the item fell in B.
    pub fn signed_diff(&self) -> i64 {
        self.rank_b as i64 - self.rank_a as i64
    }
}

/// Result of comparing two rankings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DiffResult {
    /// Shared items, ordered by ascending rank in A.
    pub shared_items: Vec<SharedItem>,
    /// Items only in A, in A's order.
    pub only_in_a: Vec<Item>,
    /// Items only in B, in B's order.
    pub only_in_b: Vec<Item>,
    /// `round(100 * shared / max(|A|, |B|))`, 0 when both are empty.
    pub similarity: u32,
}

impl DiffResult {
    /// Shared items ordered by rank in A.
    pub fn shared_by_rank_a(&self) -> Vec<&SharedItem> {
        let mut shared: Vec<&SharedItem> = self.shared_items.iter().collect();
        shared.sort_by_key(|s| s.rank_a);
        shared
    }

    /// Shared items ordered by rank in B.
    pub fn shared_by_rank_b(&self) -> Vec<&SharedItem> {
        let mut shared: Vec<&SharedItem> = self.shared_items.iter().collect();
        shared.sort_by_key(|s| s.rank_b);
        shared
    }
}

fn similarity(shared: usize, len_a: usize, len_b: usize) -> u32 {
    let denominator = len_a.max(len_b);
    if denominator == 0 {
        return 0;
    }
    (100.0 * shared as f64 / denominator as f64).round() as u32
}

/// Compare two best-first orderings.
pub fn compare_rankings(a: &[Item], b: &[Item]) -> DiffResult {
    let index_a = IdentityIndex::from_ranking(a);
    let index_b = IdentityIndex::from_ranking(b);

    let mut claimed_b: HashSet<usize> = HashSet::new();
    let mut shared_items = Vec::new();
    let mut only_in_a = Vec::new();

    for entry in index_a.entries() {
        let matched = index_b
            .find(entry.item)
            .filter(|idx| !claimed_b.contains(idx))
            .and_then(|idx| index_b.get(idx).map(|b_entry| (idx, b_entry.rank)));

        match matched {
            Some((idx, rank_b)) => {
                claimed_b.insert(idx);
                shared_items.push(SharedItem::new(entry.item.clone(), entry.rank, rank_b));
            }
            None => only_in_a.push((entry.rank, entry.item.clone())),
        }
    }

    let mut only_in_b: Vec<(usize, Item)> = index_b
        .entries()
        .iter()
        .enumerate()
        .filter(|(idx, _)| !claimed_b.contains(idx))
        .map(|(_, entry)| (entry.rank, entry.item.clone()))
        .collect();

    // Overwritten duplicates can move an entry's rank past later entries.
    shared_items.sort_by_key(|s| s.rank_a);
    only_in_a.sort_by_key(|(rank, _)| *rank);
    only_in_b.sort_by_key(|(rank, _)| *rank);

    let similarity = similarity(shared_items.len(), index_a.len(), index_b.len());

    DiffResult {
        shared_items,
        only_in_a: only_in_a.into_iter().map(|(_, item)| item).collect(),
        only_in_b: only_in_b.into_iter().map(|(_, item)| item).collect(),
        similarity,
    }
}
