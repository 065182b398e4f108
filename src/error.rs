use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::types::null_as_default;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause of a failed round trip.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a library call can fail with. Nothing is retried; each error
/// is handed straight back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input broke a local constraint. No request was sent.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The HTTP round trip itself failed.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with status >= 400.
    #[error("API error {code}: {}", ErrorList(.errors))]
    Api { code: i64, errors: Vec<String> },

    /// The body did not have the shape expected for the operation.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("group name is required")]
    NameRequired,

    #[error("group name length maximum is {max} bytes")]
    NameTooLong { max: usize },

    #[error("group description length maximum is {max} bytes")]
    DescriptionTooLong { max: usize },

    #[error("page limit maximum is {max}")]
    LimitTooLarge { max: u32 },
}

/// Wire shape of an error reply. The `response` half is always empty on
/// error paths, so only `meta` is read. Missing or `null` members of `meta`
/// fall back to zero values.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub meta: ErrorMeta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

impl From<ErrorEnvelope> for Error {
    fn from(env: ErrorEnvelope) -> Self {
        Error::Api {
            code: env.meta.code,
            errors: env.meta.errors,
        }
    }
}

struct ErrorList<'a>(&'a [String]);

impl fmt::Display for ErrorList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(no details)");
        }
        f.write_str(&self.0.join("; "))
    }
}
