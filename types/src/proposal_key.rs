//! Composite key addressing one proposal slot.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::account::AccountId;

/// A (proposer, sequence number) pair uniquely addressing one proposal.
///
/// The sequence number is caller-supplied, not allocated by the DAO.
/// Uniqueness is guaranteed only jointly with the proposer: two proposers may
/// use the same sequence number without conflict, and the DAO does not
/// coordinate numbering schemes across identities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalKey {
    pub proposer: AccountId,
    pub id: u64,
}

/// Decoding failed because the byte slice was not a valid encoded key.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid proposal key encoding: expected {expected} bytes, got {actual}")]
pub struct KeyDecodeError {
    pub expected: usize,
    pub actual: usize,
}

impl ProposalKey {
    /// Length of the wire encoding: 32-byte proposer + 8-byte big-endian id.
    pub const ENCODED_LEN: usize = AccountId::LEN + 8;

    pub fn new(proposer: AccountId, id: u64) -> Self {
        Self { proposer, id }
    }

    /// Encode to the fixed 40-byte wire form.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..AccountId::LEN].copy_from_slice(self.proposer.as_bytes());
        out[AccountId::LEN..].copy_from_slice(&self.id.to_be_bytes());
        out
    }

    /// Decode from the fixed 40-byte wire form.
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyDecodeError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(KeyDecodeError {
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        let mut proposer = [0u8; AccountId::LEN];
        proposer.copy_from_slice(&bytes[..AccountId::LEN]);
        let mut id_bytes = [0u8; 8];
        id_bytes.copy_from_slice(&bytes[AccountId::LEN..]);
        Ok(Self {
            proposer: AccountId::new(proposer),
            id: u64::from_be_bytes(id_bytes),
        })
    }
}

impl fmt::Display for ProposalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.proposer, self.id)
    }
}
