//! Error types for the playlist curation engine

/// Result type alias for jellylists operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, reordering, or saving a playlist
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server returned a non-success status
    #[error("Server error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication failed or the token lacks permission
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (playlist, item, entry)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server asked us to slow down
    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    /// The entry at the given position has no playlist-entry id.
    /// Moves and deletes address entries by that id, so this is fatal
    /// to the operation rather than a silent no-op.
    #[error("Entry at position {0} has no playlist-entry id; it cannot be moved or deleted")]
    MissingEntryId(usize),

    /// No loaded entry matches the given item id
    #[error("No loaded entry for item id: {0}")]
    UnknownItem(String),

    /// A staged target order is active; save or reload before single moves
    #[error("A staged order is active; save or reload before moving entries directly")]
    PreviewActive,

    /// The playlist is not fully loaded; the operation needs the complete order
    #[error("Playlist not fully loaded ({loaded} of {total} entries)")]
    NotFullyLoaded { loaded: usize, total: u64 },

    /// The import document contained no usable items
    #[error("Import contains no usable items")]
    EmptyImport,

    /// The import document could not be interpreted
    #[error("Malformed import: {0}")]
    MalformedImport(String),

    /// save() was called with nothing staged
    #[error("Nothing pending to save")]
    NothingPending,

    /// A chunked batch failed partway; earlier chunks stay committed
    #[error("Batch aborted after {committed} of {total} ids: {source}")]
    PartialBatch {
        committed: usize,
        total: usize,
        #[source]
        source: Box<Error>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Map an HTTP status code and response body to an error variant
    pub fn from_status_code(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimited,
            _ => Self::Api {
                status,
                message: message.into(),
            },
        }
    }

    /// True when retrying the same call later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::RateLimited | Self::Api { status: 500..=599, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_code() {
        assert!(matches!(Error::from_status_code(401, "x"), Error::Unauthorized(_)));
        assert!(matches!(Error::from_status_code(403, "x"), Error::Unauthorized(_)));
        assert!(matches!(Error::from_status_code(404, "x"), Error::NotFound(_)));
        assert!(matches!(Error::from_status_code(429, "x"), Error::RateLimited));
        assert!(matches!(
            Error::from_status_code(500, "x"),
            Error::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_is_transient() {
        assert!(Error::RateLimited.is_transient());
        assert!(Error::from_status_code(503, "down").is_transient());
        assert!(!Error::from_status_code(404, "gone").is_transient());
        assert!(!Error::MissingEntryId(3).is_transient());
    }
}
