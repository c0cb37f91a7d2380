#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors surfaced by the parsing helpers.
///
/// The reorder passes themselves never fail; these errors exist so callers
/// can log why a restore was skipped.
#[derive(Debug, Error)]
pub enum SortselError {
    #[error("saved order is not valid JSON: {0}")]
    SavedOrderJson(#[from] serde_json::Error),
    #[error("saved order is not a JSON array")]
    SavedOrderNotList,
}

pub type Result<T> = std::result::Result<T, SortselError>;
