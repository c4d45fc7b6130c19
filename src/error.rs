use thiserror::Error;

/// Malformed cell contents that abort a matching run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognised time zone label: {0:?}")]
    TimeZone(String),

    #[error("mentor {mentor} has a non-numeric mentee capacity: {value:?}")]
    Capacity { mentor: String, value: String },
}

/// Errors that can occur while loading, matching or reporting
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("missing column {column:?}")]
    MissingKey { column: String },

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MatchError {
    pub fn missing_key(column: impl Into<String>) -> Self {
        Self::MissingKey {
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
