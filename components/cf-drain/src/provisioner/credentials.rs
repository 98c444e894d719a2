// Local crates
use crate::{
    collaborators::{password::PasswordReader, random::EntropySource},
    provisioner::errors::DrainError,
};

// External crates
use sha2::{Digest, Sha256};

/// Bytes of entropy hashed into a generated password
const PASSWORD_ENTROPY_BYTES: usize = 20;

/// Username and password the forwarder authenticates to the log cache with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Username of the user created for a forwarder draining `source_id`.
pub fn generated_username(source_id: &str) -> String {
    format!("drain-{}", source_id)
}

/// Hex encoded SHA-256 digest of fresh random bytes.
pub fn generate_password(entropy: &dyn EntropySource) -> Result<String, DrainError> {
    let mut data = [0u8; PASSWORD_ENTROPY_BYTES];
    entropy.fill(&mut data).map_err(DrainError::Entropy)?;

    Ok(format!("{:x}", Sha256::digest(data)))
}

/// Ask the user for the password of an account they supplied.
pub fn prompt_password(
    passwords: &dyn PasswordReader,
    username: &str,
) -> Result<String, DrainError> {
    let password = passwords
        .read_password(&format!("Enter a password for {}", username))
        .map_err(DrainError::PasswordPrompt)?;

    if password.is_empty() {
        return Err(DrainError::BlankPassword);
    }
    Ok(password)
}
