//! DAO storage traits.
//!
//! A [`DaoStore`] answers reads against committed state and hands out
//! [`DaoTxn`] transaction handles for mutations. Every DAO operation runs
//! inside exactly one transaction: reads through the handle observe that
//! transaction's staged writes, `commit` publishes everything at once, and
//! dropping the handle discards everything. Backends serialize writers, which
//! is what makes the read-increment-write paths of the voting protocol
//! linearizable.

use curio_types::{AccountId, Amount, ProposalKey};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The winner pointer singleton: leading vote count and encoded leading
/// proposal key. `proposal` is empty until the first vote is cast.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerEntry {
    pub votes: u64,
    pub proposal: Vec<u8>,
}

impl WinnerEntry {
    /// True while no vote has ever been cast.
    pub fn is_empty(&self) -> bool {
        self.proposal.is_empty()
    }
}

/// One atomic unit of DAO state mutation.
///
/// Reads see writes staged earlier in the same transaction. Dropping the
/// handle without calling [`DaoTxn::commit`] rolls everything back.
pub trait DaoTxn {
    fn proposal_exists(&self, key: &ProposalKey) -> Result<bool, StoreError>;

    /// Serialized proposal record bytes. Fails with NotFound if absent.
    fn get_proposal(&self, key: &ProposalKey) -> Result<Vec<u8>, StoreError>;

    /// Create or overwrite the proposal record. Immutability of submitted
    /// proposals is enforced by the registry layer, not here.
    fn put_proposal(&mut self, key: &ProposalKey, data: &[u8]) -> Result<(), StoreError>;

    /// Vote count for `key`, or None if no vote box has been created.
    fn get_votes(&self, key: &ProposalKey) -> Result<Option<u64>, StoreError>;

    fn put_votes(&mut self, key: &ProposalKey, count: u64) -> Result<(), StoreError>;

    fn has_voted(&self, voter: &AccountId) -> Result<bool, StoreError>;

    /// Permanently mark `voter` as having voted.
    fn mark_voted(&mut self, voter: &AccountId) -> Result<(), StoreError>;

    fn winner(&self) -> Result<WinnerEntry, StoreError>;

    fn set_winner(&mut self, entry: &WinnerEntry) -> Result<(), StoreError>;

    /// Minimum reserve the deployment must hold, including growth staged in
    /// this transaction.
    fn reserve_requirement(&self) -> Result<Amount, StoreError>;

    /// Publish all staged writes atomically.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// A DAO storage backend.
pub trait DaoStore {
    /// Begin a write transaction. Backends serialize writers: a second call
    /// observes the first transaction's effects or none of them.
    fn begin(&self) -> Result<Box<dyn DaoTxn + '_>, StoreError>;

    fn proposal_exists(&self, key: &ProposalKey) -> Result<bool, StoreError>;

    /// Serialized proposal record bytes. Fails with NotFound if absent.
    fn get_proposal(&self, key: &ProposalKey) -> Result<Vec<u8>, StoreError>;

    fn get_votes(&self, key: &ProposalKey) -> Result<Option<u64>, StoreError>;

    fn has_voted(&self, voter: &AccountId) -> Result<bool, StoreError>;

    fn winner(&self) -> Result<WinnerEntry, StoreError>;

    /// Minimum reserve the deployment must hold for its committed storage.
    fn reserve_requirement(&self) -> Result<Amount, StoreError>;
}

/// Decode a stored 8-byte big-endian vote count.
pub fn decode_votes(bytes: &[u8]) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::Corruption("vote count has unexpected byte length".into()))?;
    Ok(u64::from_be_bytes(arr))
}

/// Encode a vote count for storage.
pub fn encode_votes(count: u64) -> [u8; 8] {
    count.to_be_bytes()
}
