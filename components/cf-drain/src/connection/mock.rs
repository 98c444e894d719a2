//! Recording [`CliConnection`] used by provisioning tests.

// Local crates
use crate::connection::{
    connection::{CliConnection, CliError},
    models::{AppSummary, OrgSummary, ServiceInstance, SpaceSummary},
};

// External crates
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory platform session.
///
/// Every command is recorded before the failure rules are checked, so a test can
/// assert both what ran and where the sequence stopped. A failure rule matches when
/// the space-joined command starts with its prefix, e.g. `"set-env drain PASSWORD"`.
#[derive(Debug)]
pub struct MockCli {
    pub org: Result<OrgSummary, CliError>,
    pub space: Result<SpaceSummary, CliError>,
    pub api_endpoint: Result<String, CliError>,
    pub ssl_disabled: Result<bool, CliError>,
    pub apps: HashMap<String, String>,
    pub services: HashMap<String, String>,
    pub failures: Vec<(String, String)>,
    pub commands: Mutex<Vec<Vec<String>>>,
}

impl Default for MockCli {
    fn default() -> Self {
        Self {
            org: Ok(OrgSummary {
                guid: "org-guid".into(),
                name: "org-name".into(),
            }),
            space: Ok(SpaceSummary {
                guid: "space-guid".into(),
                name: "space-name".into(),
            }),
            api_endpoint: Ok("api.example.com".into()),
            ssl_disabled: Ok(false),
            apps: HashMap::new(),
            services: HashMap::new(),
            failures: Vec::new(),
            commands: Mutex::new(Vec::new()),
        }
    }
}

impl MockCli {
    pub fn with_app(mut self, name: &str, guid: &str) -> Self {
        self.apps.insert(name.into(), guid.into());
        self
    }

    pub fn with_service(mut self, name: &str, guid: &str) -> Self {
        self.services.insert(name.into(), guid.into());
        self
    }

    pub fn failing(mut self, prefix: &str, message: &str) -> Self {
        self.failures.push((prefix.into(), message.into()));
        self
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().unwrap().clone()
    }

    /// Recorded commands whose first argument is `subcommand`.
    pub fn commands_named(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.commands()
            .into_iter()
            .filter(|cmd| cmd.first().map(String::as_str) == Some(subcommand))
            .collect()
    }

    /// Value passed to `set-env` for `variable`, if it was set.
    pub fn env_value(&self, variable: &str) -> Option<String> {
        self.commands_named("set-env")
            .into_iter()
            .find(|cmd| cmd.get(2).map(String::as_str) == Some(variable))
            .and_then(|cmd| cmd.get(3).cloned())
    }

    fn record(&self, args: &[String]) -> Result<Vec<String>, CliError> {
        self.commands.lock().unwrap().push(args.to_vec());

        let joined = args.join(" ");
        match self
            .failures
            .iter()
            .find(|(prefix, _)| joined.starts_with(prefix.as_str()))
        {
            Some((_, message)) => Err(CliError::new(message.as_str())),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl CliConnection for MockCli {
    async fn cli_command(&self, args: &[String]) -> Result<Vec<String>, CliError> {
        self.record(args)
    }

    async fn cli_command_without_terminal_output(
        &self,
        args: &[String],
    ) -> Result<Vec<String>, CliError> {
        self.record(args)
    }

    async fn current_org(&self) -> Result<OrgSummary, CliError> {
        self.org.clone()
    }

    async fn current_space(&self) -> Result<SpaceSummary, CliError> {
        self.space.clone()
    }

    async fn api_endpoint(&self) -> Result<String, CliError> {
        self.api_endpoint.clone()
    }

    async fn is_ssl_disabled(&self) -> Result<bool, CliError> {
        self.ssl_disabled.clone()
    }

    async fn get_app(&self, name: &str) -> Result<AppSummary, CliError> {
        match self.apps.get(name) {
            Some(guid) => Ok(AppSummary {
                guid: guid.clone(),
                name: name.into(),
            }),
            None => Err(CliError::new(format!("App {} not found", name))),
        }
    }

    async fn get_service(&self, name: &str) -> Result<ServiceInstance, CliError> {
        match self.services.get(name) {
            Some(guid) => Ok(ServiceInstance {
                guid: guid.clone(),
                name: name.into(),
            }),
            None => Err(CliError::new(format!("Service instance {} not found", name))),
        }
    }
}
