use thiserror::Error;

/// Errors raised while collecting, caching and exporting releases.
#[derive(Debug, Error)]
pub enum Error {
    /// The token exchange failed. Aborts an aggregation run.
    #[error("failed to obtain an access token: {0}")]
    Auth(String),

    /// One page of a prefix search failed. Pagination for that prefix stops.
    #[error("failed to fetch releases for prefix {prefix} at offset {offset}: {message}")]
    Fetch {
        prefix: char,
        offset: u32,
        message: String,
    },

    /// Bad or missing user input, rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// Reading or writing the release cache failed.
    #[error("cache storage failed: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Error::Persistence(err.to_string())
    }
}
