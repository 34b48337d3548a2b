//! Box key composition.
//!
//! All DAO records live in one box namespace. Proposals and vote counts share
//! the encoded proposal key, disambiguated by a two-byte prefix; ballot marks
//! are keyed by the raw voter account bytes.

use curio_types::{AccountId, ProposalKey};

/// Prefix for proposal record boxes.
pub const PROPOSAL_PREFIX: &[u8; 2] = b"p-";

/// Prefix for vote count boxes.
pub const VOTES_PREFIX: &[u8; 2] = b"v-";

/// Metadata key for the leading vote count singleton.
pub const WINNING_VOTES_KEY: &[u8] = b"winning_proposal_votes";

/// Metadata key for the leading proposal key singleton.
pub const WINNING_PROPOSAL_KEY: &[u8] = b"winning_proposal";

/// Box key for the proposal record at `key`.
pub fn proposal_box_key(key: &ProposalKey) -> [u8; 2 + ProposalKey::ENCODED_LEN] {
    prefixed_key(PROPOSAL_PREFIX, key)
}

/// Box key for the vote count at `key`.
pub fn votes_box_key(key: &ProposalKey) -> [u8; 2 + ProposalKey::ENCODED_LEN] {
    prefixed_key(VOTES_PREFIX, key)
}

/// Box key for the ballot mark of `voter`.
pub fn ballot_box_key(voter: &AccountId) -> [u8; AccountId::LEN] {
    *voter.as_bytes()
}

fn prefixed_key(prefix: &[u8; 2], key: &ProposalKey) -> [u8; 2 + ProposalKey::ENCODED_LEN] {
    let mut out = [0u8; 2 + ProposalKey::ENCODED_LEN];
    out[..2].copy_from_slice(prefix);
    out[2..].copy_from_slice(&key.encode());
    out
}
