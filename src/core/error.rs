use thiserror::Error;

use crate::core::record::Column;

/// Malformed hourly table, reported before any aggregation takes place.
#[derive(Debug, Error)]
pub enum InvalidInput {
    #[error("the hourly table is empty, at least one row is required")]
    Empty,

    #[error("row #{row} is missing the required column `{column}`")]
    MissingColumn { column: Column, row: usize },

    #[error("row #{row} has a malformed `{column}`: {reason}")]
    Malformed { column: Column, row: usize, reason: String },

    #[error("row #{row} has a non-finite `{column}`")]
    NotFinite { column: Column, row: usize },

    #[error("timestamps must be strictly ascending, but row #{row} is not")]
    Unordered { row: usize },
}
