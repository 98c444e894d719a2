//! Read access to the `cf` CLI session file (`<CF_HOME>/.cf/config.json`).
//!
//! The `cf` binary keeps the targeted API endpoint, organization, space and TLS
//! settings in this file. Only the fields drain provisioning needs are decoded.

// Local crates
use crate::connection::{
    connection::CliError,
    models::{OrgSummary, SpaceSummary},
};

// External crates
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::instrument;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(rename = "Target", default)]
    pub target: String,
    #[serde(rename = "SSLDisabled", default)]
    pub ssl_disabled: bool,
    #[serde(rename = "OrganizationFields", default)]
    pub organization: OrgSummary,
    #[serde(rename = "SpaceFields", default)]
    pub space: SpaceSummary,
}

impl SessionConfig {
    /// Location of the session file below a `CF_HOME` style directory.
    pub fn path_in(cf_home: &Path) -> PathBuf {
        cf_home.join(".cf").join("config.json")
    }

    #[instrument(
        name = "cf_drain_session::load",
        target = "connection::session",
        level = "debug",
        skip_all
    )]
    pub async fn load(path: &Path) -> Result<Self, CliError> {
        tracing::debug!(session_file = %path.display(), "Reading cf session file");

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, session_file = %path.display(), "Failed to read cf session file");
                return Err(CliError::new("Not logged in. Use 'cf login' to log in."));
            }
        };

        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode cf session file");
            CliError::new(format!(
                "Error reading cf configuration at {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn org(&self) -> Result<OrgSummary, CliError> {
        if self.organization.name.is_empty() {
            return Err(CliError::new(
                "No org targeted, use 'cf target -o ORG' to target an org.",
            ));
        }
        Ok(self.organization.clone())
    }

    pub fn space(&self) -> Result<SpaceSummary, CliError> {
        if self.space.name.is_empty() {
            return Err(CliError::new(
                "No space targeted, use 'cf target -s SPACE' to target a space.",
            ));
        }
        Ok(self.space.clone())
    }

    pub fn api_endpoint(&self) -> Result<String, CliError> {
        if self.target.is_empty() {
            return Err(CliError::new(
                "No API endpoint set. Use 'cf login' or 'cf api' to target an endpoint.",
            ));
        }
        Ok(self.target.clone())
    }
}
