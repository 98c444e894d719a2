// Local crates
use crate::provisioner::errors::DrainError;

// External crates
use clap::Args;
use std::fmt;
use std::str::FromStr;
use tracing::instrument;
use url::Url;

/// Raw `create-drain` arguments as accepted on the command line.
///
/// Positionals are collected loosely so the argument count can be reported with
/// the plugin's own message rather than clap's.
#[derive(Debug, Clone, Args)]
pub struct CreateDrainArgs {
    /// <app-or-service-name> <drain-url>
    #[arg(value_name = "ARGS")]
    pub positionals: Vec<String>,

    /// How the drain is provisioned: `service` or `application`
    #[arg(long = "adapter-type", default_value = "service")]
    pub adapter_type: String,

    /// Name of the drain service instance or forwarder application
    #[arg(long = "drain-name")]
    pub drain_name: Option<String>,

    /// What the drain forwards: `logs`, `metrics` or `all`
    #[arg(long = "type")]
    pub drain_type: Option<String>,

    /// Existing user the forwarder authenticates as (application adapter only)
    #[arg(long)]
    pub username: Option<String>,

    /// Password for `--username`. Never read from the command line, only from
    /// [`PASSWORD_ENV`] through [`CreateDrainArgs::with_password`]
    #[arg(skip)]
    pub password: Option<String>,
}

/// Environment variable carrying the `--username` password non-interactively
pub const PASSWORD_ENV: &str = "CF_DRAIN_PASSWORD";

impl CreateDrainArgs {
    /// Attach a password obtained outside the command line
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

/// Provisioning strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterType {
    /// Register the drain as a user-provided service and bind it
    Service,
    /// Push a syslog forwarder application
    Application,
}

impl FromStr for AdapterType {
    type Err = DrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(AdapterType::Service),
            "application" => Ok(AdapterType::Application),
            _ => Err(DrainError::UnsupportedAdapterType),
        }
    }
}

/// What a drain forwards, carried to the platform in the `drain-type` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainType {
    Logs,
    Metrics,
    All,
}

impl DrainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainType::Logs => "logs",
            DrainType::Metrics => "metrics",
            DrainType::All => "all",
        }
    }
}

impl fmt::Display for DrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrainType {
    type Err = DrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logs" => Ok(DrainType::Logs),
            "metrics" => Ok(DrainType::Metrics),
            "all" => Ok(DrainType::All),
            other => Err(DrainError::InvalidDrainType(other.to_string())),
        }
    }
}

/// A validated `create-drain` invocation.
///
/// `drain_url` is the argument exactly as typed unless a drain type was requested,
/// in which case it is the re-serialized URL carrying the `drain-type` parameter. `adapter_type` stays as typed so that an unknown adapter is only
/// rejected once the arguments and URL are known to be good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub app_or_service_name: String,
    pub drain_url: String,
    pub adapter_type: String,
    pub drain_name: Option<String>,
    pub drain_type: Option<DrainType>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<CreateDrainArgs> for ProvisionRequest {
    type Error = DrainError;

    #[instrument(
        name = "cf_drain_request::parse",
        target = "request::request",
        level = "debug",
        skip_all
    )]
    fn try_from(args: CreateDrainArgs) -> Result<Self, Self::Error> {
        let CreateDrainArgs {
            positionals,
            adapter_type,
            drain_name,
            drain_type,
            username,
            password,
        } = args;

        let [app_or_service_name, raw_url]: [String; 2] =
            positionals
                .try_into()
                .map_err(|positionals: Vec<String>| DrainError::InvalidArguments {
                    got: positionals.len(),
                })?;

        let mut parsed_url = Url::parse(&raw_url).map_err(DrainError::InvalidUrl)?;

        let drain_type = drain_type
            .as_deref()
            .map(DrainType::from_str)
            .transpose()?;
        let drain_url = match drain_type {
            Some(drain_type) => {
                set_drain_type(&mut parsed_url, drain_type);
                parsed_url.into()
            }
            None => raw_url,
        };

        tracing::debug!(
            target_name = %app_or_service_name,
            adapter_type = %adapter_type,
            drain_type = ?drain_type,
            "Parsed create-drain request"
        );

        Ok(Self {
            app_or_service_name,
            drain_url,
            adapter_type,
            drain_name: drain_name.filter(|name| !name.is_empty()),
            drain_type,
            username: username.filter(|name| !name.is_empty()),
            password: password.filter(|password| !password.is_empty()),
        })
    }
}

/// Set `drain-type` in the URL query, keeping every other parameter.
///
/// The query is re-encoded with keys in sorted order (values of a repeated key keep
/// their relative order) so the same input always yields the same URL.
pub fn set_drain_type(url: &mut Url, drain_type: DrainType) {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "drain-type")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.push(("drain-type".to_string(), drain_type.to_string()));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let query = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", query_escape(key), query_escape(value)))
        .collect::<Vec<_>>()
        .join("&");
    url.set_query(Some(&query));
}

/// Form-encode one query component, leaving only `A-Z a-z 0-9 - _ . ~` unescaped
/// and writing spaces as `+`, the same set every drain consumer decodes.
fn query_escape(component: &str) -> String {
    url::form_urlencoded::byte_serialize(component.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
}
