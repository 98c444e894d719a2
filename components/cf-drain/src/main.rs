mod cli;
mod collaborators;
mod connection;
mod helpers;
mod instrumentation;
mod provisioner;
mod request;

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Main entrypoint simply delegates control to CLI layer.
    // Failures end up here as a single diagnostic line and a non-zero exit status.
    match cli::cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
