//! Registry client for the manifest endpoint.
//!
//! Issues a single descriptive query against the OCI Distribution API and
//! reports the canonical digest of the referenced manifest.

use crate::api;
use crate::config::{RegistryAuth, RegistryConfig};
use crate::digest::Digest;
use crate::error::ResolveError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

/// Manifest media types accepted when resolving a reference.
const ACCEPT_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json, \
    application/vnd.oci.image.index.v1+json, \
    application/vnd.docker.distribution.manifest.v2+json, \
    application/vnd.docker.distribution.manifest.list.v2+json";

/// Response header carrying the canonical digest of the returned manifest.
const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

/// Client for resolving image references against an OCI-compatible registry.
#[derive(Debug)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry URL is malformed or the HTTP client
    /// cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pinpoint_registry::{RegistryClient, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("https://registry.example.com");
    /// let client = RegistryClient::new(config)?;
    /// # Ok::<(), pinpoint_registry::ResolveError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, ResolveError> {
        if url::Url::parse(&config.url).is_err() {
            return Err(ResolveError::InvalidUrl {
                url: config.url.clone(),
            });
        }

        let http = Self::build_http_client(&config)?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Resolves a repository tag to its content digest.
    ///
    /// Performs one GET against `/v2/<repository>/manifests/<tag>`. The
    /// digest is taken from the `Docker-Content-Digest` response header;
    /// registries that omit the header get the manifest body hashed instead,
    /// which yields the same canonical digest.
    ///
    /// # Arguments
    ///
    /// * `repository` - Repository name, non-empty.
    /// * `tag` - Tag to resolve, non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::TagNotFound`], [`ResolveError::RepositoryNotFound`]
    /// or [`ResolveError::AccessDenied`] for the matching registry error
    /// conditions, and other variants for transport-level failures.
    pub async fn resolve_digest(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<Digest, ResolveError> {
        let url = format!("{}/v2/{repository}/manifests/{tag}", self.config.url);

        tracing::debug!(repository, tag, "Resolving manifest digest");

        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .header(ACCEPT, ACCEPT_MANIFEST)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api::classify_failure(
                repository,
                tag,
                status.as_u16(),
                &body,
            ));
        }

        if let Some(header) = response.headers().get(DOCKER_CONTENT_DIGEST) {
            let raw = header.to_str().map_err(|_| ResolveError::InvalidDigest {
                digest: String::from_utf8_lossy(header.as_bytes()).into_owned(),
                reason: "non-ASCII header value".to_string(),
            })?;
            return Digest::parse(raw);
        }

        // Older registries omit the digest header; the canonical digest is
        // the hash of the manifest bytes.
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ResolveError::TagNotFound {
                repository: repository.to_string(),
                tag: tag.to_string(),
            });
        }

        Ok(Digest::compute(&body))
    }

    /// Builds the HTTP client with proper configuration.
    fn build_http_client(config: &RegistryConfig) -> Result<reqwest::Client, ResolveError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);

        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(|e| ResolveError::ConnectionFailed {
            url: config.url.clone(),
            source: e,
        })
    }

    /// Creates authentication headers based on configuration.
    fn auth_headers(&self) -> Result<HeaderMap, ResolveError> {
        let mut headers = HeaderMap::new();

        match &self.config.auth {
            RegistryAuth::None => {}
            RegistryAuth::Basic { username, password } => {
                let credentials = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{username}:{password}"),
                );
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|_| {
                        ResolveError::AuthenticationFailed {
                            message: "Invalid credentials".to_string(),
                        }
                    })?,
                );
            }
            RegistryAuth::Bearer { token } => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                        ResolveError::AuthenticationFailed {
                            message: "Invalid token".to_string(),
                        }
                    })?,
                );
            }
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = RegistryConfig::new("https://registry.example.com");
        let client = RegistryClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_malformed_url() {
        let config = RegistryConfig::new("not a url");
        let err = RegistryClient::new(config).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));
    }

    #[test]
    fn test_auth_headers_none() {
        let config = RegistryConfig::new("https://example.com");
        let client = RegistryClient::new(config).unwrap();
        let headers = client.auth_headers().unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_auth_headers_basic() {
        let config = RegistryConfig::new("https://example.com")
            .with_auth(RegistryAuth::basic("user", "pass"));
        let client = RegistryClient::new(config).unwrap();
        let headers = client.auth_headers().unwrap();

        assert!(headers.contains_key(AUTHORIZATION));
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(auth.starts_with("Basic "));
    }

    #[test]
    fn test_auth_headers_bearer() {
        let config = RegistryConfig::new("https://example.com")
            .with_auth(RegistryAuth::bearer("my-token"));
        let client = RegistryClient::new(config).unwrap();
        let headers = client.auth_headers().unwrap();

        assert!(headers.contains_key(AUTHORIZATION));
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert_eq!(auth, "Bearer my-token");
    }

    #[test]
    fn test_auth_headers_rejects_control_characters() {
        let config = RegistryConfig::new("https://example.com")
            .with_auth(RegistryAuth::bearer("bad\ntoken"));
        let client = RegistryClient::new(config).unwrap();
        let err = client.auth_headers().unwrap_err();
        assert!(matches!(err, ResolveError::AuthenticationFailed { .. }));
    }
}
