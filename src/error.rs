use thiserror::Error;

use crate::domain::error::{DomainError, FieldErrors};
use crate::domain::id::RuleId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Bulk-mutation errors. All of them are raised before anything is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BulkError {
    #[error("invalid rule form: {0}")]
    Invalid(FieldErrors),

    #[error("no game selected")]
    MissingGame,

    #[error("no target games")]
    EmptyTargets,

    #[error("unknown game selection: {}", ids.join(", "))]
    UnknownSelection { ids: Vec<String> },

    #[error("rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("confirmed {given} rules but {expected} match the criteria")]
    ConfirmationMismatch { given: usize, expected: usize },

    #[error("{summary} Re-run with --yes to proceed.")]
    Unconfirmed { summary: String },

    #[error("rules matching {criteria} changed since removal was confirmed ({confirmed} confirmed, {current} now match)")]
    StaleConfirmation {
        confirmed: usize,
        current: usize,
        criteria: String,
    },

    #[error("bulk operation cancelled after staging {staged} of {total} rules")]
    Cancelled { staged: usize, total: usize },
}

impl From<FieldErrors> for BulkError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Rule collection integrity errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("duplicate rule id: {0}")]
    DuplicateId(RuleId),

    #[error("rule {id} violates an invariant: {source}")]
    Invariant {
        id: RuleId,
        #[source]
        source: DomainError,
    },

    #[error("rule not found: {0}")]
    NotFound(RuleId),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Bulk(#[from] BulkError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote store error: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl Error {
    /// True when the failure is a transport problem reaching a remote
    /// service (connect refused, timeout), as opposed to a rejected request.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}
