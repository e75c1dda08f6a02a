//! Site keys - the public lookup handle for a store

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of freshly generated keys
pub const GENERATED_KEY_LEN: usize = 16;

/// Longest key accepted from callers
pub const MAX_KEY_LEN: usize = 64;

const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Opaque token identifying one store.
///
/// Only ASCII alphanumerics are ever accepted, so a key can be placed in a
/// storage query or a URL path without further escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SiteKey(String);

impl SiteKey {
    /// Generate a random base36 key from the thread-local CSPRNG
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let key = (0..GENERATED_KEY_LEN)
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect();
        Self(key)
    }

    /// Validate an untrusted key. Returns `None` for malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_KEY_LEN
            && raw.bytes().all(|b| b.is_ascii_alphanumeric());
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed site key '{0}'")]
pub struct InvalidSiteKey(pub String);

impl TryFrom<String> for SiteKey {
    type Error = InvalidSiteKey;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidSiteKey(raw))
    }
}

impl From<SiteKey> for String {
    fn from(key: SiteKey) -> Self {
        key.0
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
