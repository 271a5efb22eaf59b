//! Error types for digest resolution.

use thiserror::Error;

/// Errors that can occur while resolving a tag to a digest.
///
/// The first three variants mirror the registry's own error taxonomy and
/// carry enough context to report which reference failed; everything else
/// is an unexpected failure as far as callers are concerned.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Tag does not exist in the repository.
    #[error("image {repository}:{tag} not found")]
    TagNotFound {
        /// Repository name.
        repository: String,
        /// Tag that failed to resolve.
        tag: String,
    },

    /// Repository does not exist in the registry.
    #[error("repository '{repository}' does not exist")]
    RepositoryNotFound {
        /// Repository name.
        repository: String,
    },

    /// Registry refused access to the repository.
    #[error("access denied to repository '{repository}': {message}")]
    AccessDenied {
        /// Repository name.
        repository: String,
        /// Message reported by the registry.
        message: String,
    },

    /// Failed to connect to the registry.
    #[error("failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Credentials could not be encoded into a request header.
    #[error("authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// Registry URL could not be parsed.
    #[error("invalid registry URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// Digest reported by the registry is malformed.
    #[error("invalid digest '{digest}': {reason}")]
    InvalidDigest {
        /// Digest string as received.
        digest: String,
        /// Reason the digest was rejected.
        reason: String,
    },

    /// Unclassified HTTP failure from the registry.
    #[error("HTTP error from registry: {status} - {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {source}")]
    Json {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else {
            let status = err.status().map_or(0, |s| s.as_u16());
            Self::Http {
                status,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json { source: err }
    }
}
