//! Error types for blockdex operations.

use thiserror::Error;

/// Errors that can occur while configuring or feeding an extraction.
///
/// Extraction itself never fails once an [`crate::Extractor`] is built;
/// every variant here is raised before the first record is produced.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid tag name in tagsToExclude: {0:?}")]
    InvalidTagName(String),

    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
