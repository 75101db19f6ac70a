//! Errors arising from release catalog retrieval and parsing.

/// Errors arising from catalog and latest-version lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request failed before a response was received.
    #[error("unable to fetch {url}: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered with a status other than 200.
    #[error("request to {url} failed with status code {status}")]
    HttpStatus {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// The catalog body is not valid release JSON.
    #[error("failed to parse release catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog parsed but lists no releases.
    #[error("release catalog is empty")]
    Empty,

    /// The latest-version text does not look like `go<version>`.
    #[error("unexpected version format: {found:?}")]
    UnexpectedFormat {
        /// The offending line (empty when the body was blank).
        found: String,
    },
}
