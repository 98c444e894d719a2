//! Injectable sources of randomness.
//!
//! Generated drain names, group names and credentials all come through these traits
//! so provisioning can be replayed deterministically in tests.

// External crates
use rand::TryRngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

/// Produces unique identifiers (drain names, forwarder group names).
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random (version 4) UUIDs in their hyphenated lowercase form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Cryptographically secure bytes for generated passwords.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), String>;
}

/// The operating system's random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), String> {
        OsRng.try_fill_bytes(buf).map_err(|e| e.to_string())
    }
}
