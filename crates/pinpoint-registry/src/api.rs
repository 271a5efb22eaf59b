//! Wire types for the OCI Distribution API error payload.
//!
//! Registries report failures as a JSON body of the form
//! `{"errors": [{"code", "message", "detail"}]}`. The resolver
//! pattern-matches the codes in that body to tell a missing tag apart from
//! a missing repository or a permissions problem.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};

/// Error payload returned by registry API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// List of errors.
    pub errors: Vec<ApiError>,
}

/// Individual error from the registry API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code.
    pub code: ErrorCode,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// Error codes defined by the OCI Distribution Specification.
///
/// Only the codes the resolver classifies on get their own variant; any
/// other code is preserved verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// Manifest (tag) unknown to the registry.
    ManifestUnknown,

    /// Repository name unknown to the registry.
    NameUnknown,

    /// Repository name invalid.
    NameInvalid,

    /// Requested access to the resource is denied.
    Denied,

    /// Authentication required.
    Unauthorized,

    /// Any other registry error code.
    Other(String),
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ManifestUnknown => "MANIFEST_UNKNOWN",
            Self::NameUnknown => "NAME_UNKNOWN",
            Self::NameInvalid => "NAME_INVALID",
            Self::Denied => "DENIED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "MANIFEST_UNKNOWN" => Self::ManifestUnknown,
            "NAME_UNKNOWN" => Self::NameUnknown,
            "NAME_INVALID" => Self::NameInvalid,
            "DENIED" => Self::Denied,
            "UNAUTHORIZED" => Self::Unauthorized,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Classifies a failed manifest response into a [`ResolveError`].
///
/// Classification prefers the registry's structured error codes and falls
/// back to the HTTP status when the body carries none. A bare 404 with no
/// recognizable payload is treated as a missing tag, which is what a
/// registry that elides error bodies means by it.
#[must_use]
pub fn classify_failure(repository: &str, tag: &str, status: u16, body: &str) -> ResolveError {
    let errors = serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.errors)
        .unwrap_or_default();

    let has_code = |code: &ErrorCode| errors.iter().any(|e| e.code == *code);

    let denied = has_code(&ErrorCode::Denied) || has_code(&ErrorCode::Unauthorized);
    if denied || status == 401 || status == 403 {
        let message = errors
            .iter()
            .find(|e| matches!(e.code, ErrorCode::Denied | ErrorCode::Unauthorized))
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "check registry credentials".to_string());
        return ResolveError::AccessDenied {
            repository: repository.to_string(),
            message,
        };
    }

    if has_code(&ErrorCode::NameUnknown) || has_code(&ErrorCode::NameInvalid) {
        return ResolveError::RepositoryNotFound {
            repository: repository.to_string(),
        };
    }

    if has_code(&ErrorCode::ManifestUnknown) || status == 404 {
        return ResolveError::TagNotFound {
            repository: repository.to_string(),
            tag: tag.to_string(),
        };
    }

    let message = errors
        .first()
        .map_or_else(|| body.trim().to_string(), |e| e.message.clone());
    ResolveError::Http { status, message }
}
