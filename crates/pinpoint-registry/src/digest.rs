//! Content digest newtype.

use crate::error::ResolveError;
use sha2::{Digest as _, Sha256};

/// A content-addressable image digest in `<algorithm>:<hex>` form.
///
/// A parsed digest is guaranteed to have a non-empty algorithm and a
/// non-empty lowercase hexadecimal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Parses a digest string as received from a registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinpoint_registry::Digest;
    ///
    /// let digest = Digest::parse(
    ///     "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    /// ).unwrap();
    /// assert_eq!(digest.algorithm(), "sha256");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidDigest`] if the string is not in
    /// `<algorithm>:<hex>` form.
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let Some((algorithm, value)) = input.split_once(':') else {
            return Err(ResolveError::InvalidDigest {
                digest: input.to_string(),
                reason: "missing algorithm separator".to_string(),
            });
        };

        if algorithm.is_empty() {
            return Err(ResolveError::InvalidDigest {
                digest: input.to_string(),
                reason: "empty algorithm".to_string(),
            });
        }

        if value.is_empty() {
            return Err(ResolveError::InvalidDigest {
                digest: input.to_string(),
                reason: "empty value".to_string(),
            });
        }

        if !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ResolveError::InvalidDigest {
                digest: input.to_string(),
                reason: "value is not lowercase hex".to_string(),
            });
        }

        Ok(Self(input.to_string()))
    }

    /// Computes the SHA-256 digest of raw bytes.
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("sha256:{}", hex::encode(hasher.finalize())))
    }

    /// Returns the digest algorithm (e.g., "sha256").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        self.0.split(':').next().unwrap_or("sha256")
    }

    /// Returns the digest value (without algorithm prefix).
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or(&self.0)
    }

    /// Returns the full digest string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_EMPTY: &str =
        "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_parse_valid() {
        let digest = Digest::parse(SHA256_EMPTY).unwrap();
        assert_eq!(digest.algorithm(), "sha256");
        assert_eq!(digest.value().len(), 64);
        assert_eq!(digest.as_str(), SHA256_EMPTY);
    }

    #[test]
    fn test_parse_missing_separator() {
        let err = Digest::parse("abc123").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDigest { .. }));
    }

    #[test]
    fn test_parse_empty_algorithm() {
        assert!(Digest::parse(":abc123").is_err());
    }

    #[test]
    fn test_parse_empty_value() {
        assert!(Digest::parse("sha256:").is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(Digest::parse("sha256:XYZ").is_err());
        assert!(Digest::parse("sha256:ABCDEF").is_err());
    }

    #[test]
    fn test_compute() {
        let digest = Digest::compute(b"");
        assert_eq!(digest.as_str(), SHA256_EMPTY);
    }

    #[test]
    fn test_compute_roundtrips_through_parse() {
        let digest = Digest::compute(b"manifest body");
        assert!(Digest::parse(digest.as_str()).is_ok());
    }

    #[test]
    fn test_display() {
        let digest = Digest::parse(SHA256_EMPTY).unwrap();
        assert_eq!(digest.to_string(), SHA256_EMPTY);
    }
}
