//! API Key generation
//!
//! Generates cryptographically secure, fixed-length API key tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

/// Random bytes per key: 256 bits of entropy
pub const KEY_BYTES: usize = 32;

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated keys (e.g., "fk_live_", "fk_test_")
    prefix: String,
}

impl ApiKeyGenerator {
    /// Create a new API key generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Create a generator for production keys
    pub fn production() -> Self {
        Self::new("fk_live_")
    }

    /// Create a generator for test keys
    pub fn test() -> Self {
        Self::new("fk_test_")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Length of every token this generator produces
    pub fn token_len(&self) -> usize {
        self.prefix.len() + base64_len(KEY_BYTES)
    }

    /// Generate a new API key token
    pub fn generate(&self) -> String {
        let mut random_bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        format!("{}{}", self.prefix, URL_SAFE_NO_PAD.encode(random_bytes))
    }
}

fn base64_len(bytes: usize) -> usize {
    (bytes * 4).div_ceil(3)
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::production()
    }
}
