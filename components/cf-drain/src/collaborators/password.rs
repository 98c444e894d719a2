// External crates
use dialoguer::Password;
use std::io;

/// Masked interactive input for credentials the user chooses to supply.
pub trait PasswordReader: Send + Sync {
    fn read_password(&self, prompt: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal without echoing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPasswordReader;

impl PasswordReader for TerminalPasswordReader {
    fn read_password(&self, prompt: &str) -> io::Result<String> {
        // Blank input is accepted here and rejected by the provisioner with its own message
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
    }
}
