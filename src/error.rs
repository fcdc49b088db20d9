//! Error types for loading inputs and persisting outputs
//!
//! The projection itself never fails; everything here comes from the
//! surfaces around it (files, parameter documents, the leaderboard store).

use thiserror::Error;

/// Errors raised by loaders, validators, and record stores
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("cost table `{table}`: {reason}")]
    MalformedTable { table: String, reason: String },

    #[error("leaderboard entry rejected: {0}")]
    Leaderboard(String),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
