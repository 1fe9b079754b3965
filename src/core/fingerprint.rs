// File: src/core/fingerprint.rs
//! Content fingerprints used by the session cache gates.
//!
//! Each field is fed to SHA-256 with a length prefix, so `("ab", "c")` and
//! `("a", "bc")` never collide.

use sha2::{Digest, Sha256};

/// Hex encoded SHA-256 digest over a canonical framing of the fields.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new(domain: &str) -> Self {
        let mut fingerprint = Self::default();
        fingerprint.field(domain);
        fingerprint
    }

    pub fn field(&mut self, value: &str) -> &mut Self {
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn list(&mut self, values: &[String]) -> &mut Self {
        self.hasher.update((values.len() as u64).to_le_bytes());
        for value in values {
            self.field(value);
        }
        self
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
