//! Resolve command implementation.
//!
//! Resolves a repository tag to its content digest and translates failures
//! into the exit-code contract consumed by pipeline automation.

use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use tracing::info;

use pinpoint_registry::{Digest, RegistryAuth, RegistryClient, RegistryConfig, ResolveError};

/// Exit code when the tag does not exist in the repository.
pub const EXIT_TAG_NOT_FOUND: u8 = 1;

/// Exit code when the repository does not exist.
pub const EXIT_REPOSITORY_NOT_FOUND: u8 = 2;

/// Exit code when the registry denies access.
pub const EXIT_ACCESS_DENIED: u8 = 3;

/// Exit code for any other failure, including bad arguments.
pub const EXIT_UNEXPECTED: u8 = 4;

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Repository name in the registry (e.g. `team/app`)
    #[arg(required = true)]
    pub repository: String,

    /// Tag to resolve to a digest
    #[arg(required = true)]
    pub tag: String,

    /// Registry URL (e.g. `<https://registry.example.com>`)
    #[arg(short, long, env = "PINPOINT_REGISTRY_URL")]
    pub registry: String,

    /// Bearer token for authentication
    #[arg(long, env = "PINPOINT_REGISTRY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Username for basic authentication
    #[arg(short, long, env = "PINPOINT_REGISTRY_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "PINPOINT_REGISTRY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Accept invalid TLS certificates (lab registries only)
    #[arg(long)]
    pub insecure: bool,
}

/// Runs the resolve command.
///
/// Prints the digest to stdout on success. On failure, writes one
/// `::error::` annotation line to stderr and returns the matching exit
/// code.
pub fn run(args: &ResolveArgs) -> ExitCode {
    if args.repository.is_empty() || args.tag.is_empty() {
        annotate("Repository and tag must be non-empty");
        return ExitCode::from(EXIT_UNEXPECTED);
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            annotate(&format!("Failed to create async runtime: {err}"));
            return ExitCode::from(EXIT_UNEXPECTED);
        }
    };

    match rt.block_on(resolve(args)) {
        Ok(digest) => {
            println!("{digest}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            annotate(&annotation(&args.repository, &args.tag, &err));
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn resolve(args: &ResolveArgs) -> Result<Digest, ResolveError> {
    info!(
        registry = %args.registry,
        repository = %args.repository,
        tag = %args.tag,
        "Resolving digest"
    );

    let mut config = RegistryConfig::new(&args.registry)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_auth(determine_auth(args)?);

    if args.insecure {
        config = config.insecure();
    }

    let client = RegistryClient::new(config)?;
    client.resolve_digest(&args.repository, &args.tag).await
}

/// Maps a resolution failure to the process exit code contract.
fn exit_code(err: &ResolveError) -> u8 {
    match err {
        ResolveError::TagNotFound { .. } => EXIT_TAG_NOT_FOUND,
        ResolveError::RepositoryNotFound { .. } => EXIT_REPOSITORY_NOT_FOUND,
        ResolveError::AccessDenied { .. } => EXIT_ACCESS_DENIED,
        _ => EXIT_UNEXPECTED,
    }
}

/// Formats the stderr annotation for a resolution failure.
fn annotation(repository: &str, tag: &str, err: &ResolveError) -> String {
    match err {
        ResolveError::TagNotFound { .. } => format!(
            "Image {repository}:{tag} not found, tag may have been deleted or never built"
        ),
        ResolveError::RepositoryNotFound { .. } => {
            format!("Registry repository '{repository}' does not exist")
        }
        ResolveError::AccessDenied { message, .. } => {
            format!("Access denied to repository '{repository}': {message}")
        }
        other => format!("Unexpected error resolving {repository}:{tag}: {other}"),
    }
}

/// Writes an error annotation line to stderr.
///
/// The `::error::` prefix is the workflow-command format CI log parsers
/// surface as failure annotations.
fn annotate(message: &str) {
    eprintln!("::error::{message}");
}

/// Determines the authentication method from CLI arguments.
fn determine_auth(args: &ResolveArgs) -> Result<RegistryAuth, ResolveError> {
    if let Some(ref token) = args.token {
        return Ok(RegistryAuth::Bearer {
            token: token.clone(),
        });
    }

    if let (Some(ref username), Some(ref password)) = (&args.username, &args.password) {
        return Ok(RegistryAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        });
    }

    if args.username.is_some() || args.password.is_some() {
        return Err(ResolveError::AuthenticationFailed {
            message: "Both --username and --password are required for basic authentication"
                .to_string(),
        });
    }

    // No auth - useful for local development
    Ok(RegistryAuth::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ResolveArgs {
        ResolveArgs {
            repository: "team/app".to_string(),
            tag: "v1.2.0".to_string(),
            registry: "https://registry.example.com".to_string(),
            token: None,
            username: None,
            password: None,
            timeout: 30,
            insecure: false,
        }
    }

    fn tag_not_found() -> ResolveError {
        ResolveError::TagNotFound {
            repository: "team/app".to_string(),
            tag: "v1.2.0".to_string(),
        }
    }

    #[test]
    fn test_determine_auth_none() {
        let auth = determine_auth(&args()).unwrap();
        assert!(matches!(auth, RegistryAuth::None));
    }

    #[test]
    fn test_determine_auth_bearer() {
        let mut args = args();
        args.token = Some("test-token".to_string());

        let auth = determine_auth(&args).unwrap();
        match auth {
            RegistryAuth::Bearer { token } => assert_eq!(token, "test-token"),
            _ => panic!("Expected Bearer auth"),
        }
    }

    #[test]
    fn test_determine_auth_basic() {
        let mut args = args();
        args.username = Some("user".to_string());
        args.password = Some("pass".to_string());

        let auth = determine_auth(&args).unwrap();
        match auth {
            RegistryAuth::Basic { username, password } => {
                assert_eq!(username, "user");
                assert_eq!(password, "pass");
            }
            _ => panic!("Expected Basic auth"),
        }
    }

    #[test]
    fn test_determine_auth_token_wins_over_basic() {
        let mut args = args();
        args.token = Some("test-token".to_string());
        args.username = Some("user".to_string());
        args.password = Some("pass".to_string());

        let auth = determine_auth(&args).unwrap();
        assert!(matches!(auth, RegistryAuth::Bearer { .. }));
    }

    #[test]
    fn test_determine_auth_incomplete_basic() {
        let mut args = args();
        args.username = Some("user".to_string());

        let result = determine_auth(&args);
        assert!(result.is_err());
    }

    #[test]
    fn test_exit_code_tag_not_found() {
        assert_eq!(exit_code(&tag_not_found()), 1);
    }

    #[test]
    fn test_exit_code_repository_not_found() {
        let err = ResolveError::RepositoryNotFound {
            repository: "team/app".to_string(),
        };
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_access_denied() {
        let err = ResolveError::AccessDenied {
            repository: "team/app".to_string(),
            message: "check registry credentials".to_string(),
        };
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn test_exit_code_unexpected() {
        let err = ResolveError::Http {
            status: 500,
            message: "internal server error".to_string(),
        };
        assert_eq!(exit_code(&err), 4);

        let err = ResolveError::InvalidDigest {
            digest: "bogus".to_string(),
            reason: "missing algorithm separator".to_string(),
        };
        assert_eq!(exit_code(&err), 4);

        let err = ResolveError::AuthenticationFailed {
            message: "Invalid token".to_string(),
        };
        assert_eq!(exit_code(&err), 4);
    }

    #[test]
    fn test_annotation_tag_not_found() {
        let message = annotation("team/app", "v1.2.0", &tag_not_found());
        assert_eq!(
            message,
            "Image team/app:v1.2.0 not found, tag may have been deleted or never built"
        );
    }

    #[test]
    fn test_annotation_repository_not_found() {
        let err = ResolveError::RepositoryNotFound {
            repository: "ghost".to_string(),
        };
        let message = annotation("ghost", "v1", &err);
        assert_eq!(message, "Registry repository 'ghost' does not exist");
    }

    #[test]
    fn test_annotation_access_denied() {
        let err = ResolveError::AccessDenied {
            repository: "team/app".to_string(),
            message: "pull not permitted".to_string(),
        };
        let message = annotation("team/app", "v1", &err);
        assert_eq!(
            message,
            "Access denied to repository 'team/app': pull not permitted"
        );
    }

    #[test]
    fn test_annotation_unexpected() {
        let err = ResolveError::Http {
            status: 500,
            message: "internal server error".to_string(),
        };
        let message = annotation("team/app", "v1", &err);
        assert!(message.starts_with("Unexpected error resolving team/app:v1:"));
    }
}
