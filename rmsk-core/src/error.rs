use crate::types::RecordId;
use thiserror::Error;

/// Errors raised while validating, laying out or rendering annotations
#[derive(Debug, Error)]
pub enum RmskError {
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: RecordId, reason: String },

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: RecordId, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Layout covers {found} records but {expected} were supplied")]
    LayoutMismatch { expected: usize, found: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid name filter: {0}")]
    InvalidFilter(#[from] regex::Error),
}

pub type RmskResult<T> = Result<T, RmskError>;

impl RmskError {
    pub fn malformed<S: Into<String>>(id: RecordId, reason: S) -> Self {
        Self::MalformedRecord { id, reason: reason.into() }
    }

    pub fn invalid_record<S: Into<String>>(id: RecordId, reason: S) -> Self {
        Self::InvalidRecord { id, reason: reason.into() }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Parse { line, message: message.into() }
    }
}
