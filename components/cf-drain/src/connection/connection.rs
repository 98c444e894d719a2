//! The narrow view of the platform CLI session that drain provisioning talks to.
//!
//! Provisioning never shells out or reads session state directly, everything goes
//! through [`CliConnection`] so the provisioning flow can run against the real `cf`
//! binary ([`crate::connection::cf::CfCli`]) or a recording stand-in under test.

// Local crates
use crate::connection::models::{AppSummary, OrgSummary, ServiceInstance, SpaceSummary};

// External crates
use async_trait::async_trait;

/// Failure reported by the platform CLI. The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CliError(pub String);

impl CliError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self(message.into())
    }
}

/// Command execution and session accessors of the platform CLI.
#[async_trait]
pub trait CliConnection: Send + Sync {
    /// Run a `cf` command, letting its output reach the terminal.
    async fn cli_command(&self, args: &[String]) -> Result<Vec<String>, CliError>;

    /// Run a `cf` command without echoing its output.
    async fn cli_command_without_terminal_output(
        &self,
        args: &[String],
    ) -> Result<Vec<String>, CliError>;

    async fn current_org(&self) -> Result<OrgSummary, CliError>;

    async fn current_space(&self) -> Result<SpaceSummary, CliError>;

    /// API endpoint of the targeted platform, as stored in the session.
    async fn api_endpoint(&self) -> Result<String, CliError>;

    /// Whether the session skips TLS certificate verification.
    async fn is_ssl_disabled(&self) -> Result<bool, CliError>;

    async fn get_app(&self, name: &str) -> Result<AppSummary, CliError>;

    async fn get_service(&self, name: &str) -> Result<ServiceInstance, CliError>;
}
