// Local crates
use crate::provisioner::{
    credentials::{Credential, generate_password, generated_username, prompt_password},
    errors::DrainError,
    provisioner::DrainProvisioner,
};
use crate::request::request::ProvisionRequest;

// External crates
use std::path::Path;
use tracing::instrument;

/// Release asset name of the forwarder binary
pub const FORWARDER_ASSET: &str = "syslog_forwarder";
const FORWARDER_BUILDPACK: &str = "binary_buildpack";
const FORWARDER_COMMAND: &str = "./syslog_forwarder";
/// OAuth client the forwarder uses against UAA
const FORWARDER_CLIENT_ID: &str = "cf";
const FORWARDER_DRAIN_SCOPE: &str = "single";
const FORWARDER_SPACE_ROLE: &str = "SpaceDeveloper";

/// Where the drained source lives and which platform endpoints the forwarder talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub source_id: String,
    pub org: String,
    pub space: String,
    pub api_endpoint: String,
}

impl ResolvedIdentity {
    /// `org.space.target`, the host name drained messages are reported under.
    pub fn source_host_name(&self, target: &str) -> String {
        format!("{}.{}.{}", self.org, self.space, target)
    }

    pub fn uaa_url(&self) -> String {
        self.api_endpoint.replacen("api.", "uaa.", 1)
    }

    pub fn log_cache_addr(&self) -> String {
        self.api_endpoint.replacen("api.", "log-cache.", 1)
    }
}

impl DrainProvisioner<'_> {
    /// Application adapter: push a syslog forwarder named `drain_name` that reads the
    /// source's envelopes from the log cache and relays them to the drain URL.
    #[instrument(
        name = "cf_drain_provisioner::application_adapter",
        target = "provisioner::application",
        level = "debug",
        skip_all
    )]
    pub(crate) async fn push_syslog_forwarder(
        &self,
        request: &ProvisionRequest,
        drain_name: &str,
    ) -> Result<(), DrainError> {
        let target = request.app_or_service_name.as_str();

        let identity = self.resolve_identity(target).await?;
        let credential = self.credential(request, &identity).await?;

        let asset = self.downloader.download(FORWARDER_ASSET).await?;
        let asset_dir = asset
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        tracing::debug!(drain_name = %drain_name, asset_dir = %asset_dir.display(), "Pushing syslog forwarder");
        let command = [
            "push".to_string(),
            drain_name.to_string(),
            "-p".to_string(),
            asset_dir.display().to_string(),
            "-b".to_string(),
            FORWARDER_BUILDPACK.to_string(),
            "-c".to_string(),
            FORWARDER_COMMAND.to_string(),
            "--no-start".to_string(),
        ];
        self.cli.cli_command(&command).await?;

        let skip_cert_verify = self.cli.is_ssl_disabled().await?;
        let group_name = self.ids.new_id();

        let environment = [
            ("SOURCE_ID", identity.source_id.clone()),
            ("SOURCE_HOST_NAME", identity.source_host_name(target)),
            ("UAA_URL", identity.uaa_url()),
            ("CLIENT_ID", FORWARDER_CLIENT_ID.to_string()),
            ("USERNAME", credential.username),
            ("PASSWORD", credential.password),
            ("LOG_CACHE_HTTP_ADDR", identity.log_cache_addr()),
            ("SYSLOG_URL", request.drain_url.clone()),
            ("SKIP_CERT_VERIFY", skip_cert_verify.to_string()),
            ("GROUP_NAME", group_name),
            ("DRAIN_SCOPE", FORWARDER_DRAIN_SCOPE.to_string()),
        ];

        for (variable, value) in environment {
            tracing::debug!(drain_name = %drain_name, variable = %variable, "Setting forwarder environment");
            let command = [
                "set-env".to_string(),
                drain_name.to_string(),
                variable.to_string(),
                value,
            ];
            self.cli.cli_command_without_terminal_output(&command).await?;
        }

        tracing::debug!(drain_name = %drain_name, "Starting syslog forwarder");
        self.cli
            .cli_command(&["start".to_string(), drain_name.to_string()])
            .await?;

        Ok(())
    }

    /// Resolve the drained source and the session it lives in.
    async fn resolve_identity(&self, target: &str) -> Result<ResolvedIdentity, DrainError> {
        let source_id = self.source_id(target).await?;
        let org = self.cli.current_org().await?;
        let space = self.cli.current_space().await?;
        let api_endpoint = self.cli.api_endpoint().await?;
        tracing::debug!(org_guid = %org.guid, space_guid = %space.guid, api_endpoint = %api_endpoint, "Resolved session target");

        Ok(ResolvedIdentity {
            source_id,
            org: org.name,
            space: space.name,
            api_endpoint,
        })
    }

    /// GUID of `name` as an application, falling back to a service instance.
    async fn source_id(&self, name: &str) -> Result<String, DrainError> {
        match self.cli.get_app(name).await {
            Ok(app) => {
                tracing::debug!(source_id = %app.guid, source_name = %app.name, "Drained source is an application");
                return Ok(app.guid);
            }
            Err(e) => tracing::debug!(error = %e, "Source is not an application, trying service instances"),
        }

        match self.cli.get_service(name).await {
            Ok(service) => {
                tracing::debug!(source_id = %service.guid, source_name = %service.name, "Drained source is a service instance");
                Ok(service.guid)
            }
            Err(e) => {
                tracing::error!(error = %e, source = %name, "Source is neither an application nor a service instance");
                Err(DrainError::UnknownSource(name.to_string()))
            }
        }
    }

    /// Credentials the forwarder reads the log cache with.
    ///
    /// Without a username a dedicated space developer is created for the drain.
    /// A username without a password means the password is asked for.
    async fn credential(
        &self,
        request: &ProvisionRequest,
        identity: &ResolvedIdentity,
    ) -> Result<Credential, DrainError> {
        let Some(username) = &request.username else {
            let username = generated_username(&identity.source_id);
            let password = generate_password(self.entropy)?;
            self.create_user(&username, &password, identity).await?;
            return Ok(Credential { username, password });
        };

        let password = match &request.password {
            Some(password) => password.clone(),
            None => prompt_password(self.passwords, username)?,
        };
        Ok(Credential {
            username: username.clone(),
            password,
        })
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        identity: &ResolvedIdentity,
    ) -> Result<(), DrainError> {
        tracing::info!(username = %username, "Creating drain user");
        self.cli
            .cli_command(&[
                "create-user".to_string(),
                username.to_string(),
                password.to_string(),
            ])
            .await?;

        tracing::debug!(username = %username, org = %identity.org, space = %identity.space, "Granting drain user space developer role");
        self.cli
            .cli_command(&[
                "set-space-role".to_string(),
                username.to_string(),
                identity.org.clone(),
                identity.space.clone(),
                FORWARDER_SPACE_ROLE.to_string(),
            ])
            .await?;

        Ok(())
    }
}
