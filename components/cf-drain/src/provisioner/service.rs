// Local crates
use crate::provisioner::{errors::DrainError, provisioner::DrainProvisioner};

// External crates
use tracing::instrument;

impl DrainProvisioner<'_> {
    /// Service adapter: register `drain_url` as a user-provided service named
    /// `drain_name` and bind it to `app_name`.
    ///
    /// A failed bind leaves the freshly created service instance behind.
    #[instrument(
        name = "cf_drain_provisioner::service_adapter",
        target = "provisioner::service",
        level = "debug",
        skip_all
    )]
    pub(crate) async fn create_and_bind_service(
        &self,
        app_name: &str,
        drain_name: &str,
        drain_url: &str,
    ) -> Result<(), DrainError> {
        tracing::debug!(app_name = %app_name, "Verifying drained application exists");
        self.cli.get_app(app_name).await?;

        tracing::debug!(drain_name = %drain_name, "Creating user-provided drain service");
        let command = [
            "create-user-provided-service".to_string(),
            drain_name.to_string(),
            "-l".to_string(),
            drain_url.to_string(),
        ];
        self.cli.cli_command(&command).await?;

        tracing::debug!(drain_name = %drain_name, app_name = %app_name, "Binding drain service");
        let command = [
            "bind-service".to_string(),
            app_name.to_string(),
            drain_name.to_string(),
        ];
        self.cli.cli_command(&command).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::connection::mock::MockCli;
    use crate::provisioner::provisioner::stubs::*;
    use crate::request::request::{CreateDrainArgs, ProvisionRequest};
    use clap::Parser;
    use regex::Regex;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[tokio::test]
    async fn creates_and_binds_user_provided_service() {
        let cli = MockCli::default().with_app("app-name", "app-guid");

        provision(&cli, &StubPasswords(None), &request("service"))
            .await
            .unwrap();

        assert_eq!(
            cli.commands(),
            vec![
                strings(&[
                    "create-user-provided-service",
                    "cf-drain-id-0",
                    "-l",
                    "syslog://drain.example.com:514",
                ]),
                strings(&["bind-service", "app-name", "cf-drain-id-0"]),
            ]
        );
    }

    #[tokio::test]
    async fn generated_name_is_prefixed_uuid() {
        let cli = MockCli::default().with_app("app-name", "app-guid");

        provision_with_uuids(&cli, &request("service")).await.unwrap();

        let pattern = Regex::new(
            r"^cf-drain-[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
        )
        .unwrap();
        let created = &cli.commands_named("create-user-provided-service")[0][1];
        let bound = &cli.commands_named("bind-service")[0][2];
        assert!(pattern.is_match(created), "{} is not a generated name", created);
        assert_eq!(created, bound);
    }

    #[tokio::test]
    async fn typed_drain_url_is_registered() {
        let cli = MockCli::default().with_app("app-name", "app-guid");
        let request = parsed_request(&["syslog://drain.example.com:514", "--type", "metrics"]);

        provision(&cli, &StubPasswords(None), &request).await.unwrap();

        assert_eq!(
            cli.commands_named("create-user-provided-service")[0][3],
            "syslog://drain.example.com:514?drain-type=metrics"
        );
    }

    #[tokio::test]
    async fn untyped_drain_url_is_registered_as_typed() {
        let cli = MockCli::default().with_app("app-name", "app-guid");
        let request = parsed_request(&["https://logs.example.com"]);

        provision(&cli, &StubPasswords(None), &request).await.unwrap();

        assert_eq!(
            cli.commands_named("create-user-provided-service")[0][3],
            "https://logs.example.com"
        );
    }

    #[tokio::test]
    async fn missing_app_aborts_with_lookup_error() {
        let cli = MockCli::default();

        let err = provision(&cli, &StubPasswords(None), &request("service"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "App app-name not found");
        assert!(cli.commands().is_empty());
    }

    #[tokio::test]
    async fn create_failure_aborts_before_bind() {
        let cli = MockCli::default()
            .with_app("app-name", "app-guid")
            .failing("create-user-provided-service", "Service instance already exists");

        let err = provision(&cli, &StubPasswords(None), &request("service"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Service instance already exists");
        assert!(cli.commands_named("bind-service").is_empty());
    }

    #[tokio::test]
    async fn bind_failure_leaves_service_in_place() {
        let cli = MockCli::default()
            .with_app("app-name", "app-guid")
            .failing("bind-service", "bind failed");

        let err = provision(&cli, &StubPasswords(None), &request("service"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "bind failed");
        assert_eq!(cli.commands_named("create-user-provided-service").len(), 1);
        assert!(
            !cli.commands()
                .iter()
                .any(|cmd| cmd[0].starts_with("delete")),
            "no compensating delete is issued"
        );
    }

    /// Build a request the way the command line does, for `app-name`.
    fn parsed_request(argv: &[&str]) -> ProvisionRequest {
        #[derive(Parser)]
        struct CreateDrainCommand {
            #[command(flatten)]
            args: CreateDrainArgs,
        }

        let command = CreateDrainCommand::try_parse_from(
            ["create-drain", "app-name"].into_iter().chain(argv.iter().copied()),
        )
        .unwrap();
        ProvisionRequest::try_from(command.args).unwrap()
    }
}
