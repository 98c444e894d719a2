//! Drain Provisioner - responsibility and behavior
//!
//! Turns a validated [`ProvisionRequest`] into the ordered sequence of platform CLI
//! commands that create the drain. Two strategies exist:
//! - `service`: register the syslog URL as a user-provided service and bind it to the app.
//! - `application`: push a syslog forwarder app and wire it up through environment variables.
//!
//! Every step is awaited before the next one starts and the first failure ends the
//! whole operation. Nothing already created is cleaned up: a service instance that
//! failed to bind, a created user or a pushed but unstarted forwarder stay in place.

// Local crates
use crate::{
    collaborators::{
        downloader::Downloader,
        password::PasswordReader,
        random::{EntropySource, IdGenerator},
    },
    connection::connection::CliConnection,
    provisioner::errors::DrainError,
    request::request::{AdapterType, ProvisionRequest},
};

// External crates
use tracing::instrument;

/// Prefix of drain names generated when the user does not pick one
pub const GENERATED_DRAIN_PREFIX: &str = "cf-drain-";

/// Runs drain provisioning against its injected collaborators.
pub struct DrainProvisioner<'a> {
    pub(crate) cli: &'a dyn CliConnection,
    pub(crate) downloader: &'a dyn Downloader,
    pub(crate) passwords: &'a dyn PasswordReader,
    pub(crate) ids: &'a dyn IdGenerator,
    pub(crate) entropy: &'a dyn EntropySource,
}

impl std::fmt::Debug for DrainProvisioner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrainProvisioner").finish_non_exhaustive()
    }
}

impl<'a> DrainProvisioner<'a> {
    pub fn new(
        cli: &'a dyn CliConnection,
        downloader: &'a dyn Downloader,
        passwords: &'a dyn PasswordReader,
        ids: &'a dyn IdGenerator,
        entropy: &'a dyn EntropySource,
    ) -> Self {
        Self {
            cli,
            downloader,
            passwords,
            ids,
            entropy,
        }
    }

    /// Create the drain described by `request` using its adapter type.
    #[instrument(
        name = "cf_drain_provisioner::create_drain",
        target = "provisioner::provisioner",
        level = "info",
        skip_all,
        fields(target_name = %request.app_or_service_name, adapter_type = %request.adapter_type)
    )]
    pub async fn create_drain(&self, request: &ProvisionRequest) -> Result<(), DrainError> {
        let adapter = match request.adapter_type.parse::<AdapterType>() {
            Ok(adapter) => adapter,
            Err(e) => {
                tracing::error!(error = %e, "Rejected drain request");
                return Err(e);
            }
        };
        let drain_name = self.drain_name(request);

        tracing::info!(drain_name = %drain_name, "Provisioning syslog drain");
        let result = match adapter {
            AdapterType::Service => {
                self.create_and_bind_service(
                    &request.app_or_service_name,
                    &drain_name,
                    &request.drain_url,
                )
                .await
            }
            AdapterType::Application => self.push_syslog_forwarder(request, &drain_name).await,
        };

        match &result {
            Ok(()) => tracing::info!(drain_name = %drain_name, "Syslog drain provisioned"),
            Err(e) => tracing::error!(drain_name = %drain_name, error = %e, "Syslog drain provisioning failed"),
        }
        result
    }

    /// The user supplied drain name, else `cf-drain-<uuid>`.
    fn drain_name(&self, request: &ProvisionRequest) -> String {
        match &request.drain_name {
            Some(name) => name.clone(),
            None => format!("{}{}", GENERATED_DRAIN_PREFIX, self.ids.new_id()),
        }
    }
}

/// Test doubles shared by the provisioning strategy tests.
#[cfg(test)]
pub(crate) mod stubs {
    use super::*;
    use crate::collaborators::random::UuidV4Generator;
    use crate::connection::mock::MockCli;
    use async_trait::async_trait;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct StubDownloader;

    #[async_trait]
    impl Downloader for StubDownloader {
        async fn download(&self, asset_name: &str) -> Result<PathBuf, DrainError> {
            Ok(PathBuf::from("/tmp/cf-drain-assets").join(asset_name))
        }
    }

    /// Returns the configured input, or fails the test if a prompt was not expected.
    pub struct StubPasswords(pub Option<&'static str>);

    impl PasswordReader for StubPasswords {
        fn read_password(&self, _: &str) -> io::Result<String> {
            match self.0 {
                Some(password) => Ok(password.to_string()),
                None => panic!("unexpected password prompt"),
            }
        }
    }

    /// Hands out `id-0`, `id-1`, ... in call order.
    #[derive(Default)]
    pub struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn new_id(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    pub struct ZeroEntropy;

    impl EntropySource for ZeroEntropy {
        fn fill(&self, buf: &mut [u8]) -> Result<(), String> {
            buf.fill(0);
            Ok(())
        }
    }

    pub fn request(adapter_type: &str) -> ProvisionRequest {
        ProvisionRequest {
            app_or_service_name: "app-name".into(),
            drain_url: "syslog://drain.example.com:514".into(),
            adapter_type: adapter_type.into(),
            drain_name: None,
            drain_type: None,
            username: None,
            password: None,
        }
    }

    /// Run `create_drain` with deterministic collaborators.
    pub async fn provision(
        cli: &MockCli,
        passwords: &StubPasswords,
        request: &ProvisionRequest,
    ) -> Result<(), DrainError> {
        let ids = SequentialIds::default();
        DrainProvisioner::new(cli, &StubDownloader, passwords, &ids, &ZeroEntropy)
            .create_drain(request)
            .await
    }

    /// Run `create_drain` with real UUID generation.
    pub async fn provision_with_uuids(
        cli: &MockCli,
        request: &ProvisionRequest,
    ) -> Result<(), DrainError> {
        DrainProvisioner::new(
            cli,
            &StubDownloader,
            &StubPasswords(None),
            &UuidV4Generator,
            &ZeroEntropy,
        )
        .create_drain(request)
        .await
    }
}
