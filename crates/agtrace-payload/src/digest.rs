use std::fmt;

use serde::{Deserialize, Serialize};

/// BLAKE3 digest of a serialized payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadDigest([u8; 32]);

impl PayloadDigest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadDigest({})", self.short_hex())
    }
}

impl fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Domain-separated BLAKE3 hasher for payload bytes.
///
/// The domain tag is prepended to every computation so a payload digest can
/// never collide with a digest of the same bytes taken for another purpose.
pub struct PayloadHasher {
    domain: &'static str,
}

impl PayloadHasher {
    /// Hasher for event payloads.
    pub const EVENT: Self = Self::new("agtrace-payload-v1");

    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    pub fn hash(&self, data: &[u8]) -> PayloadDigest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        PayloadDigest(*hasher.finalize().as_bytes())
    }
}
