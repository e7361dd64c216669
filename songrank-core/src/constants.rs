/// Hard upper bound on probes for a single item, regardless of list size.
///
/// A well-formed binary search over a list of 2^20 items needs 20 probes, so
/// this only fires when the bounds carried by a pending comparison stop
/// shrinking. When it fires the item is placed at the current low bound.
pub const MAX_PROBE_ITERATIONS: u32 = 64;

/// Slack added on top of `ceil(log2(len + 1))` when computing the per-item
/// probe ceiling. Covers resumed drafts whose probe position was not the
/// midpoint of its bounds.
pub const PROBE_SLACK: u32 = 2;

/// Separator used when an item has no catalog id and its id is derived from
/// title and artist.
pub const FALLBACK_ID_SEPARATOR: &str = " - ";

/// `ceil(log2(n))` for `n >= 1`, and 0 for `n == 0`.
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        return 0;
    }
    usize::BITS - (n - 1).leading_zeros()
}

/// Number of probes after which the search for one item is cut off,
/// for a ranked list of `ranked_len` items.
pub fn probe_ceiling(ranked_len: usize) -> u32 {
    (ceil_log2(ranked_len + 1) + PROBE_SLACK).min(MAX_PROBE_ITERATIONS)
}
