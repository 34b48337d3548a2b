//! In-memory backend for testing.
//!
//! A mutex-guarded map of boxes plus the winner singleton. A transaction
//! holds the lock for its whole lifetime and stages writes in an overlay, so
//! writers serialize exactly like the LMDB backend's single write
//! transaction.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use curio_types::{AccountId, Amount, ProposalKey, StorageSchedule};

use crate::dao::{decode_votes, encode_votes, DaoStore, DaoTxn, WinnerEntry};
use crate::error::StoreError;
use crate::keys;

#[derive(Default)]
struct MemoryInner {
    boxes: BTreeMap<Vec<u8>, Vec<u8>>,
    winner: WinnerEntry,
}

/// An in-memory [`DaoStore`].
pub struct MemoryDaoStore {
    schedule: StorageSchedule,
    inner: Mutex<MemoryInner>,
}

impl MemoryDaoStore {
    pub fn new(schedule: StorageSchedule) -> Self {
        Self {
            schedule,
            inner: Mutex::new(MemoryInner::default()),
        }
    }

    pub fn schedule(&self) -> &StorageSchedule {
        &self.schedule
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))
    }
}

impl Default for MemoryDaoStore {
    fn default() -> Self {
        Self::new(StorageSchedule::default())
    }
}

impl DaoStore for MemoryDaoStore {
    fn begin(&self) -> Result<Box<dyn DaoTxn + '_>, StoreError> {
        Ok(Box::new(MemoryTxn {
            schedule: self.schedule,
            committed: self.lock()?,
            staged: BTreeMap::new(),
            staged_winner: None,
        }))
    }

    fn proposal_exists(&self, key: &ProposalKey) -> Result<bool, StoreError> {
        Ok(self
            .lock()?
            .boxes
            .contains_key(keys::proposal_box_key(key).as_slice()))
    }

    fn get_proposal(&self, key: &ProposalKey) -> Result<Vec<u8>, StoreError> {
        self.lock()?
            .boxes
            .get(keys::proposal_box_key(key).as_slice())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {}", key)))
    }

    fn get_votes(&self, key: &ProposalKey) -> Result<Option<u64>, StoreError> {
        self.lock()?
            .boxes
            .get(keys::votes_box_key(key).as_slice())
            .map(|bytes| decode_votes(bytes))
            .transpose()
    }

    fn has_voted(&self, voter: &AccountId) -> Result<bool, StoreError> {
        Ok(self
            .lock()?
            .boxes
            .contains_key(keys::ballot_box_key(voter).as_slice()))
    }

    fn winner(&self) -> Result<WinnerEntry, StoreError> {
        Ok(self.lock()?.winner.clone())
    }

    fn reserve_requirement(&self) -> Result<Amount, StoreError> {
        let inner = self.lock()?;
        let boxes = inner.boxes.len() as u64;
        let bytes: u64 = inner
            .boxes
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum();
        Ok(self.schedule.requirement(boxes, bytes))
    }
}

struct MemoryTxn<'a> {
    schedule: StorageSchedule,
    committed: MutexGuard<'a, MemoryInner>,
    staged: BTreeMap<Vec<u8>, Vec<u8>>,
    staged_winner: Option<WinnerEntry>,
}

impl MemoryTxn<'_> {
    fn read_box(&self, key: &[u8]) -> Option<&Vec<u8>> {
        self.staged.get(key).or_else(|| self.committed.boxes.get(key))
    }
}

impl DaoTxn for MemoryTxn<'_> {
    fn proposal_exists(&self, key: &ProposalKey) -> Result<bool, StoreError> {
        Ok(self.read_box(&keys::proposal_box_key(key)).is_some())
    }

    fn get_proposal(&self, key: &ProposalKey) -> Result<Vec<u8>, StoreError> {
        self.read_box(&keys::proposal_box_key(key))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {}", key)))
    }

    fn put_proposal(&mut self, key: &ProposalKey, data: &[u8]) -> Result<(), StoreError> {
        self.staged
            .insert(keys::proposal_box_key(key).to_vec(), data.to_vec());
        Ok(())
    }

    fn get_votes(&self, key: &ProposalKey) -> Result<Option<u64>, StoreError> {
        self.read_box(&keys::votes_box_key(key))
            .map(|bytes| decode_votes(bytes))
            .transpose()
    }

    fn put_votes(&mut self, key: &ProposalKey, count: u64) -> Result<(), StoreError> {
        self.staged
            .insert(keys::votes_box_key(key).to_vec(), encode_votes(count).to_vec());
        Ok(())
    }

    fn has_voted(&self, voter: &AccountId) -> Result<bool, StoreError> {
        Ok(self.read_box(&keys::ballot_box_key(voter)).is_some())
    }

    fn mark_voted(&mut self, voter: &AccountId) -> Result<(), StoreError> {
        self.staged
            .insert(keys::ballot_box_key(voter).to_vec(), vec![1u8]);
        Ok(())
    }

    fn winner(&self) -> Result<WinnerEntry, StoreError> {
        Ok(self
            .staged_winner
            .clone()
            .unwrap_or_else(|| self.committed.winner.clone()))
    }

    fn set_winner(&mut self, entry: &WinnerEntry) -> Result<(), StoreError> {
        self.staged_winner = Some(entry.clone());
        Ok(())
    }

    fn reserve_requirement(&self) -> Result<Amount, StoreError> {
        let mut boxes = 0u64;
        let mut bytes = 0u64;
        for (key, value) in self.committed.boxes.iter() {
            let effective = self.staged.get(key).unwrap_or(value);
            boxes += 1;
            bytes += (key.len() + effective.len()) as u64;
        }
        for (key, value) in self.staged.iter() {
            if !self.committed.boxes.contains_key(key) {
                boxes += 1;
                bytes += (key.len() + value.len()) as u64;
            }
        }
        Ok(self.schedule.requirement(boxes, bytes))
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTxn {
            mut committed,
            staged,
            staged_winner,
            ..
        } = *self;
        for (key, value) in staged {
            committed.boxes.insert(key, value);
        }
        if let Some(winner) = staged_winner {
            committed.winner = winner;
        }
        Ok(())
    }
}
