//! # Pinpoint Registry
//!
//! OCI registry client for resolving image tags to content digests.
//!
//! This crate issues a single manifest lookup against an OCI-compatible
//! container registry (Docker Registry, Harbor, ECR, GCR, etc.) and reports
//! the canonical digest of the referenced image. Failures are classified
//! into a small taxonomy so callers can distinguish a missing tag from a
//! missing repository from a permissions problem.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pinpoint_registry::{RegistryClient, RegistryConfig, RegistryAuth};
//!
//! # async fn run() -> Result<(), pinpoint_registry::ResolveError> {
//! let config = RegistryConfig::new("https://registry.example.com")
//!     .with_auth(RegistryAuth::bearer("my-token"));
//!
//! let client = RegistryClient::new(config)?;
//! let digest = client.resolve_digest("team/app", "v1.2.0").await?;
//! println!("{digest}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod api;
mod client;
mod config;
mod digest;
mod error;

pub use api::{classify_failure, ApiError, ErrorCode, ErrorResponse};
pub use client::RegistryClient;
pub use config::{RegistryAuth, RegistryConfig};
pub use digest::Digest;
pub use error::ResolveError;
