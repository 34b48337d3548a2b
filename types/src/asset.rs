//! Identifier assigned to a minted asset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An identifier for an issued asset.
///
/// Assigned by the minting authority; the DAO only carries it back to the
/// caller. Zero is never a valid issued id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(u64);

impl AssetId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
