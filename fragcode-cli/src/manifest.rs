//! Sidecar manifest written next to a record stream.
//!
//! Records carry the code parameters but not the message length or any
//! end-to-end check, so `encode` writes both here and `decode` uses them to
//! strip the padding and verify the result.

use anyhow::{bail, Context, Result};
use fragcode_core::CodeParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What a receiver needs beyond the records themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Code parameters of the session
    pub params: CodeParams,

    /// Original message length in bytes
    pub message_len: usize,

    /// Number of redundancy fragments written after the systematic ones
    pub redundancy: usize,

    /// BLAKE3 digest of the original message, hex encoded
    pub blake3: String,
}

impl Manifest {
    /// Describe `message` encoded with `params`
    pub fn new(params: CodeParams, message: &[u8], redundancy: usize) -> Self {
        Self {
            params,
            message_len: message.len(),
            redundancy,
            blake3: digest(message),
        }
    }

    /// Check a recovered message against the recorded length and digest
    pub fn verify(&self, message: &[u8]) -> Result<()> {
        if message.len() != self.message_len {
            bail!(
                "Recovered {} bytes, manifest says {}",
                message.len(),
                self.message_len
            );
        }
        let actual = digest(message);
        if actual != self.blake3 {
            bail!(
                "BLAKE3 mismatch: manifest has {}, recovered message has {}",
                self.blake3,
                actual
            );
        }
        Ok(())
    }

    /// Read a manifest from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
        manifest
            .params
            .validate()
            .with_context(|| format!("Invalid code parameters in {}", path.display()))?;
        Ok(manifest)
    }

    /// Write the manifest as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))
    }
}

/// Hex BLAKE3 digest
pub fn digest(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}
