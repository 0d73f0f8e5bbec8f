use thiserror::Error;

use crate::types::TableKind;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("no table with class '{class}' found for {kind} season {season}")]
    TableNotFound {
        kind: TableKind,
        season: i32,
        class: String,
    },

    #[error("invalid CSS selector '{0}'")]
    InvalidSelector(String),

    #[error("invalid season '{0}'")]
    InvalidSeason(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single table row produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowSkip {
    #[error("row has {found} cells, expected at least {expected}")]
    TooFewCells { found: usize, expected: usize },

    #[error("cell {0} is missing")]
    MissingCell(usize),

    #[error("cannot split team and rank from '{0}'")]
    MalformedTeamRank(String),
}
