// Local crates
use crate::connection::{
    connection::{CliConnection, CliError},
    models::{AppSummary, OrgSummary, ServiceInstance, SpaceSummary},
    session::SessionConfig,
};

// External crates
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::instrument;

/// [`CliConnection`] backed by the `cf` executable and its session file.
///
/// Commands are run one at a time and awaited to completion. Only the subcommand
/// name is ever logged since arguments carry credentials (`create-user`, `set-env`).
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: PathBuf,
    session_file: PathBuf,
}

impl CfCli {
    pub fn new(binary: PathBuf, cf_home: PathBuf) -> Self {
        Self {
            binary,
            session_file: SessionConfig::path_in(&cf_home),
        }
    }

    #[instrument(
        name = "cf_drain_cf::run",
        target = "connection::cf",
        level = "debug",
        skip_all,
        fields(subcommand = args.first().map(String::as_str).unwrap_or_default())
    )]
    async fn run(&self, args: &[String], echo: bool) -> Result<Vec<String>, CliError> {
        tracing::debug!(binary = %self.binary.display(), "Running cf command");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to launch cf executable");
                CliError::new(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if echo {
            // Terminal output is best effort, a closed stdout must not fail provisioning
            let _ = std::io::stdout().write_all(&output.stdout);
            let _ = std::io::stderr().write_all(&output.stderr);
        }

        if !output.status.success() {
            let err = failure_message(args, &output);
            tracing::error!(status = %output.status, error = %err, "cf command failed");
            return Err(err);
        }

        tracing::debug!(status = %output.status, "cf command succeeded");
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_owned)
            .collect())
    }

    /// Resolve a `cf <kind> <name> --guid` lookup to its GUID.
    async fn guid(&self, kind: &str, name: &str) -> Result<String, CliError> {
        let args = [kind.to_string(), name.to_string(), "--guid".to_string()];
        let lines = self.run(&args, false).await?;

        lines
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| CliError::new(format!("{} {} not found", kind, name)))
    }

    async fn session(&self) -> Result<SessionConfig, CliError> {
        SessionConfig::load(&self.session_file).await
    }
}

/// Pick the most useful text out of a failed command: stderr, then stdout, then status.
fn failure_message(args: &[String], output: &Output) -> CliError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return CliError::new(stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        return CliError::new(stdout.trim());
    }

    CliError::new(format!(
        "cf {} exited with {}",
        args.first().map(String::as_str).unwrap_or_default(),
        output.status
    ))
}

#[async_trait]
impl CliConnection for CfCli {
    async fn cli_command(&self, args: &[String]) -> Result<Vec<String>, CliError> {
        self.run(args, true).await
    }

    async fn cli_command_without_terminal_output(
        &self,
        args: &[String],
    ) -> Result<Vec<String>, CliError> {
        self.run(args, false).await
    }

    async fn current_org(&self) -> Result<OrgSummary, CliError> {
        self.session().await?.org()
    }

    async fn current_space(&self) -> Result<SpaceSummary, CliError> {
        self.session().await?.space()
    }

    async fn api_endpoint(&self) -> Result<String, CliError> {
        self.session().await?.api_endpoint()
    }

    async fn is_ssl_disabled(&self) -> Result<bool, CliError> {
        Ok(self.session().await?.ssl_disabled)
    }

    async fn get_app(&self, name: &str) -> Result<AppSummary, CliError> {
        let guid = self.guid("app", name).await?;
        Ok(AppSummary {
            guid,
            name: name.to_string(),
        })
    }

    async fn get_service(&self, name: &str) -> Result<ServiceInstance, CliError> {
        let guid = self.guid("service", name).await?;
        Ok(ServiceInstance {
            guid,
            name: name.to_string(),
        })
    }
}
