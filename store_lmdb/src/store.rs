//! LMDB implementation of the DAO storage traits.
//!
//! Every mutation runs inside one LMDB write transaction. Reads through the
//! transaction observe its staged writes; [`DaoTxn::commit`] is the only
//! fsync, and a dropped transaction is aborted, rolling everything back.

use std::path::Path;

use heed::RwTxn;

use curio_store::dao::{decode_votes, encode_votes};
use curio_store::{keys, DaoStore, DaoTxn, StoreError, WinnerEntry};
use curio_types::{AccountId, Amount, ProposalKey, StorageSchedule};

use crate::environment::{BOX_BYTES_KEY, BOX_COUNT_KEY};
use crate::{LmdbEnvironment, LmdbError};

/// An LMDB-backed [`DaoStore`].
pub struct LmdbDaoStore {
    env: LmdbEnvironment,
}

impl LmdbDaoStore {
    /// Open or create a store at the given path.
    pub fn open(
        path: &Path,
        schedule: StorageSchedule,
        map_size: usize,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            env: LmdbEnvironment::open(path, schedule, map_size)?,
        })
    }

    pub fn new(env: LmdbEnvironment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }

    fn meta_u64_committed(&self, key: &[u8]) -> Result<u64, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let val = self.env.meta_db.get(&rtxn, key).map_err(LmdbError::from)?;
        match val {
            Some(bytes) => decode_u64(bytes),
            None => Ok(0),
        }
    }
}

impl DaoStore for LmdbDaoStore {
    fn begin(&self) -> Result<Box<dyn DaoTxn + '_>, StoreError> {
        let txn = self.env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Box::new(LmdbDaoTxn { txn, store: self }))
    }

    fn proposal_exists(&self, key: &ProposalKey) -> Result<bool, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bk = keys::proposal_box_key(key);
        Ok(self
            .env
            .boxes_db
            .get(&rtxn, bk.as_slice())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn get_proposal(&self, key: &ProposalKey) -> Result<Vec<u8>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bk = keys::proposal_box_key(key);
        let val = self
            .env
            .boxes_db
            .get(&rtxn, bk.as_slice())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("proposal {}", key)))?;
        Ok(val.to_vec())
    }

    fn get_votes(&self, key: &ProposalKey) -> Result<Option<u64>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bk = keys::votes_box_key(key);
        self.env
            .boxes_db
            .get(&rtxn, bk.as_slice())
            .map_err(LmdbError::from)?
            .map(decode_votes)
            .transpose()
    }

    fn has_voted(&self, voter: &AccountId) -> Result<bool, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bk = keys::ballot_box_key(voter);
        Ok(self
            .env
            .boxes_db
            .get(&rtxn, bk.as_slice())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn winner(&self) -> Result<WinnerEntry, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        read_winner(&self.env, &rtxn)
    }

    fn reserve_requirement(&self) -> Result<Amount, StoreError> {
        let boxes = self.meta_u64_committed(BOX_COUNT_KEY)?;
        let bytes = self.meta_u64_committed(BOX_BYTES_KEY)?;
        Ok(self.env.schedule().requirement(boxes, bytes))
    }
}

/// A write transaction over the DAO store.
pub struct LmdbDaoTxn<'a> {
    txn: RwTxn<'a>,
    store: &'a LmdbDaoStore,
}

impl LmdbDaoTxn<'_> {
    fn meta_u64(&self, key: &[u8]) -> Result<u64, StoreError> {
        let val = self
            .store
            .env
            .meta_db
            .get(&self.txn, key)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => decode_u64(bytes),
            None => Ok(0),
        }
    }

    fn put_meta_u64(&mut self, key: &[u8], value: u64) -> Result<(), StoreError> {
        self.store
            .env
            .meta_db
            .put(&mut self.txn, key, &value.to_be_bytes())
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Put a box, maintaining the reserve-accounting counters.
    fn put_box(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let old_len = self
            .store
            .env
            .boxes_db
            .get(&self.txn, key)
            .map_err(LmdbError::from)?
            .map(|v| v.len() as u64);
        self.store
            .env
            .boxes_db
            .put(&mut self.txn, key, value)
            .map_err(LmdbError::from)?;

        match old_len {
            None => {
                let count = self.meta_u64(BOX_COUNT_KEY)?;
                self.put_meta_u64(BOX_COUNT_KEY, count.saturating_add(1))?;
                let bytes = self.meta_u64(BOX_BYTES_KEY)?;
                let grown = bytes.saturating_add((key.len() + value.len()) as u64);
                self.put_meta_u64(BOX_BYTES_KEY, grown)?;
            }
            Some(old) if old != value.len() as u64 => {
                let bytes = self.meta_u64(BOX_BYTES_KEY)?;
                let adjusted = bytes.saturating_sub(old).saturating_add(value.len() as u64);
                self.put_meta_u64(BOX_BYTES_KEY, adjusted)?;
            }
            Some(_) => {}
        }
        Ok(())
    }
}

impl DaoTxn for LmdbDaoTxn<'_> {
    fn proposal_exists(&self, key: &ProposalKey) -> Result<bool, StoreError> {
        let bk = keys::proposal_box_key(key);
        Ok(self
            .store
            .env
            .boxes_db
            .get(&self.txn, bk.as_slice())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn get_proposal(&self, key: &ProposalKey) -> Result<Vec<u8>, StoreError> {
        let bk = keys::proposal_box_key(key);
        let val = self
            .store
            .env
            .boxes_db
            .get(&self.txn, bk.as_slice())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("proposal {}", key)))?;
        Ok(val.to_vec())
    }

    fn put_proposal(&mut self, key: &ProposalKey, data: &[u8]) -> Result<(), StoreError> {
        let bk = keys::proposal_box_key(key);
        self.put_box(bk.as_slice(), data)
    }

    fn get_votes(&self, key: &ProposalKey) -> Result<Option<u64>, StoreError> {
        let bk = keys::votes_box_key(key);
        self.store
            .env
            .boxes_db
            .get(&self.txn, bk.as_slice())
            .map_err(LmdbError::from)?
            .map(decode_votes)
            .transpose()
    }

    fn put_votes(&mut self, key: &ProposalKey, count: u64) -> Result<(), StoreError> {
        let bk = keys::votes_box_key(key);
        self.put_box(bk.as_slice(), &encode_votes(count))
    }

    fn has_voted(&self, voter: &AccountId) -> Result<bool, StoreError> {
        let bk = keys::ballot_box_key(voter);
        Ok(self
            .store
            .env
            .boxes_db
            .get(&self.txn, bk.as_slice())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn mark_voted(&mut self, voter: &AccountId) -> Result<(), StoreError> {
        let bk = keys::ballot_box_key(voter);
        self.put_box(bk.as_slice(), &[1u8])
    }

    fn winner(&self) -> Result<WinnerEntry, StoreError> {
        read_winner(&self.store.env, &self.txn)
    }

    fn set_winner(&mut self, entry: &WinnerEntry) -> Result<(), StoreError> {
        self.store
            .env
            .meta_db
            .put(
                &mut self.txn,
                keys::WINNING_VOTES_KEY,
                &entry.votes.to_be_bytes(),
            )
            .map_err(LmdbError::from)?;
        self.store
            .env
            .meta_db
            .put(&mut self.txn, keys::WINNING_PROPOSAL_KEY, &entry.proposal)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn reserve_requirement(&self) -> Result<Amount, StoreError> {
        let boxes = self.meta_u64(BOX_COUNT_KEY)?;
        let bytes = self.meta_u64(BOX_BYTES_KEY)?;
        Ok(self.store.env.schedule().requirement(boxes, bytes))
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

fn read_winner(env: &LmdbEnvironment, rtxn: &heed::RoTxn) -> Result<WinnerEntry, StoreError> {
    let votes = match env
        .meta_db
        .get(rtxn, keys::WINNING_VOTES_KEY)
        .map_err(LmdbError::from)?
    {
        Some(bytes) => decode_u64(bytes)?,
        None => 0,
    };
    let proposal = env
        .meta_db
        .get(rtxn, keys::WINNING_PROPOSAL_KEY)
        .map_err(LmdbError::from)?
        .map(|b| b.to_vec())
        .unwrap_or_default();
    Ok(WinnerEntry { votes, proposal })
}

fn decode_u64(bytes: &[u8]) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::Corruption("counter has unexpected byte length".into()))?;
    Ok(u64::from_be_bytes(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: open a store in a temporary directory.
    fn temp_store() -> (tempfile::TempDir, LmdbDaoStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = LmdbDaoStore::open(dir.path(), StorageSchedule::default(), 10 * 1024 * 1024)
            .expect("failed to open store");
        (dir, store)
    }

    fn test_key(seed: u8, id: u64) -> ProposalKey {
        ProposalKey::new(AccountId::new([seed; 32]), id)
    }

    #[test]
    fn open_initializes_winner_singletons() {
        let (_dir, store) = temp_store();
        let winner = store.winner().unwrap();
        assert_eq!(winner.votes, 0);
        assert!(winner.is_empty());
        assert_eq!(
            store.reserve_requirement().unwrap(),
            store.environment().schedule().requirement(0, 0)
        );
    }

    #[test]
    fn proposal_put_and_get_across_commit() {
        let (_dir, store) = temp_store();
        let key = test_key(1, 0);

        let mut txn = store.begin().unwrap();
        assert!(!txn.proposal_exists(&key).unwrap());
        txn.put_proposal(&key, b"proposal-bytes").unwrap();
        assert!(txn.proposal_exists(&key).unwrap());
        txn.commit().unwrap();

        assert!(store.proposal_exists(&key).unwrap());
        assert_eq!(store.get_proposal(&key).unwrap(), b"proposal-bytes");
    }

    #[test]
    fn dropped_txn_does_not_persist() {
        let (_dir, store) = temp_store();
        let key = test_key(2, 0);

        {
            let mut txn = store.begin().unwrap();
            txn.put_proposal(&key, b"should-not-persist").unwrap();
            // txn is dropped here, implicit rollback
        }

        assert!(!store.proposal_exists(&key).unwrap());
        assert!(store.get_proposal(&key).is_err());
        assert_eq!(
            store.reserve_requirement().unwrap(),
            store.environment().schedule().requirement(0, 0)
        );
    }

    #[test]
    fn vote_counts_roundtrip() {
        let (_dir, store) = temp_store();
        let key = test_key(3, 9);

        assert_eq!(store.get_votes(&key).unwrap(), None);

        let mut txn = store.begin().unwrap();
        txn.put_votes(&key, 0).unwrap();
        assert_eq!(txn.get_votes(&key).unwrap(), Some(0));
        txn.put_votes(&key, 1).unwrap();
        txn.commit().unwrap();

        assert_eq!(store.get_votes(&key).unwrap(), Some(1));
    }

    #[test]
    fn ballot_marks_persist() {
        let (_dir, store) = temp_store();
        let voter = AccountId::new([4u8; 32]);

        assert!(!store.has_voted(&voter).unwrap());

        let mut txn = store.begin().unwrap();
        txn.mark_voted(&voter).unwrap();
        txn.commit().unwrap();

        assert!(store.has_voted(&voter).unwrap());
    }

    #[test]
    fn reserve_requirement_tracks_box_growth() {
        let (_dir, store) = temp_store();
        let schedule = *store.environment().schedule();
        let key = test_key(5, 0);

        let mut txn = store.begin().unwrap();
        let before = txn.reserve_requirement().unwrap();
        txn.put_proposal(&key, b"0123456789").unwrap();
        let after = txn.reserve_requirement().unwrap();
        let box_key_len = keys::proposal_box_key(&key).len();
        assert_eq!(
            after.saturating_sub(before),
            schedule.box_cost(box_key_len, 10)
        );
        txn.commit().unwrap();

        assert_eq!(store.reserve_requirement().unwrap(), after);
    }

    #[test]
    fn reserve_requirement_unchanged_on_same_size_overwrite() {
        let (_dir, store) = temp_store();
        let key = test_key(6, 0);

        let mut txn = store.begin().unwrap();
        txn.put_votes(&key, 1).unwrap();
        txn.commit().unwrap();
        let before = store.reserve_requirement().unwrap();

        let mut txn = store.begin().unwrap();
        txn.put_votes(&key, 2).unwrap();
        txn.commit().unwrap();

        assert_eq!(store.reserve_requirement().unwrap(), before);
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let key = test_key(7, 3);
        let voter = AccountId::new([8u8; 32]);
        let entry = WinnerEntry {
            votes: 2,
            proposal: key.encode().to_vec(),
        };

        let requirement = {
            let store =
                LmdbDaoStore::open(dir.path(), StorageSchedule::default(), 10 * 1024 * 1024)
                    .unwrap();
            let mut txn = store.begin().unwrap();
            txn.put_proposal(&key, b"persistent").unwrap();
            txn.put_votes(&key, 2).unwrap();
            txn.mark_voted(&voter).unwrap();
            txn.set_winner(&entry).unwrap();
            txn.commit().unwrap();
            store.reserve_requirement().unwrap()
        };

        let store =
            LmdbDaoStore::open(dir.path(), StorageSchedule::default(), 10 * 1024 * 1024).unwrap();
        assert_eq!(store.get_proposal(&key).unwrap(), b"persistent");
        assert_eq!(store.get_votes(&key).unwrap(), Some(2));
        assert!(store.has_voted(&voter).unwrap());
        assert_eq!(store.winner().unwrap(), entry);
        // Reopening must not reset the singletons or counters.
        assert_eq!(store.reserve_requirement().unwrap(), requirement);
    }
}
