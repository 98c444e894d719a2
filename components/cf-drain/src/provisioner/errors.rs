// Local crates
use crate::connection::connection::CliError;

// External crates
use std::path::PathBuf;

/// Drain provisioning error handling
/// - Every variant is fatal to the invocation. Nothing is retried or rolled back, the
/// message is surfaced as-is by the top level and the process exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum DrainError {
    #[error("Invalid arguments, expected 2, got {got}.")]
    InvalidArguments { got: usize },
    #[error("Invalid syslog drain URL: {0}")]
    InvalidUrl(url::ParseError),
    #[error("Invalid type: {0}")]
    InvalidDrainType(String),
    #[error("unsupported adapter type, must be 'service' or 'application'")]
    UnsupportedAdapterType,
    #[error("unknown application or service {0:?}")]
    UnknownSource(String),
    #[error("Password cannot be blank.")]
    BlankPassword,
    #[error("failed to read password: {0}")]
    PasswordPrompt(std::io::Error),
    #[error("failed to generate credentials: {0}")]
    Entropy(String),
    #[error("forwarder asset {name} not found in {}", .dir.display())]
    AssetNotFound { name: String, dir: PathBuf },
    /// Underlying `cf` command failures are passed through verbatim
    #[error(transparent)]
    Cli(#[from] CliError),
}
