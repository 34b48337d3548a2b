//! Content digest attached to a proposal.

use blake2::{Blake2s256, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hex;

/// A 32-byte metadata digest.
///
/// Proposals carry the digest of the content behind their URL so that voters
/// can verify what they are voting on. The DAO itself never recomputes it;
/// [`MetadataHash::digest`] is a convenience for callers that hold the
/// content locally.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataHash([u8; 32]);

impl MetadataHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Digest arbitrary content into a metadata hash (Blake2s-256).
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Blake2s256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for MetadataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetadataHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for MetadataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
