use thiserror::Error;

/// Errors surfaced by the ranking engine.
///
/// A rejected call never mutates engine state, so the caller can always
/// retry from the state it already holds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// An answer was submitted after every item was placed or skipped.
    #[error("ranking is already complete")]
    AlreadyComplete,

    /// The engine is not waiting on any comparison.
    #[error("no comparison is pending")]
    NoPendingComparison,

    /// The comparison handed back does not match the one the engine asked.
    /// Usually a duplicate or out-of-order submission.
    #[error("submitted comparison ({submitted}) does not match the pending one ({expected})")]
    StaleComparison { submitted: String, expected: String },

    /// A stored snapshot cannot be resumed as-is.
    #[error("invalid draft snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RankError>;
