// Local crates
use crate::{
    collaborators::{
        downloader::AssetDirectory,
        password::TerminalPasswordReader,
        random::{OsEntropy, UuidV4Generator},
    },
    connection::cf::CfCli,
    helpers::load_config::Config,
    instrumentation,
    provisioner::provisioner::DrainProvisioner,
    request::request::{CreateDrainArgs, PASSWORD_ENV, ProvisionRequest},
};

// External crates
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cf-drain",
    long_about = "cf-drain provisions syslog drains for platform applications and service instances, either as a bound user-provided service or as a pushed syslog forwarder application.",
    about = "Syslog drain provisioning for the cf CLI",
    version,
    term_width = 100,
    after_help = "\
    EXAMPLES:
        cf-drain create-drain my-app syslog://logs.example.com:514
        cf-drain create-drain my-app https://logs.example.com/drain --type metrics
        cf-drain create-drain my-db syslog-tls://logs.example.com:6514 --adapter-type application"
)]
struct Cli {
    /// Configuration file [default: ~/.config/cf-drain/config.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a syslog drain for an application or service instance
    CreateDrain(CreateDrainArgs),

    /// Validate the configuration file and print the resolved settings
    Validate,

    /// Display version information
    Version,
}

/// Entry function for CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref())?;
    let _guard = instrumentation::tracing::init_tracing(&config.logging);
    instrumentation::tracing::init_panic_handler();

    match cli.command {
        Commands::CreateDrain(args) => create_drain(&config, args).await?,
        Commands::Validate => validate_config(&config),
        Commands::Version => show_version(),
    }

    Ok(())
}

//
// ------------------------ Command Implementations ------------------------------
//

/// Parse the drain request and provision it against the real `cf` session
async fn create_drain(config: &Config, args: CreateDrainArgs) -> Result<()> {
    let password = std::env::var(PASSWORD_ENV).ok();
    let request = ProvisionRequest::try_from(args.with_password(password))?;

    let cli = CfCli::new(config.cf.binary.clone(), config.cf.cf_home());
    let downloader = AssetDirectory::new(config.forwarder.asset_dir.clone());
    let provisioner = DrainProvisioner::new(
        &cli,
        &downloader,
        &TerminalPasswordReader,
        &UuidV4Generator,
        &OsEntropy,
    );

    provisioner.create_drain(&request).await?;
    Ok(())
}

/// Print the configuration the other commands would run with
fn validate_config(config: &Config) {
    println!("Configuration valid:\n{:#?}", config);
}

/// Show version information
fn show_version() {
    println!("cf-drain {}", env!("CARGO_PKG_VERSION"));
}
