//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use curio_store::{keys, StoreError};
use curio_types::StorageSchedule;

use crate::LmdbError;

/// Metadata key for the number of allocated boxes.
pub(crate) const BOX_COUNT_KEY: &[u8] = b"box_count";

/// Metadata key for the total bytes of box keys and values.
pub(crate) const BOX_BYTES_KEY: &[u8] = b"box_bytes";

/// Wraps the LMDB environment and the database handles.
///
/// `boxes` holds every DAO box (proposals, vote counts, ballot marks) under
/// its composed key; `meta` holds the winner singletons and the
/// reserve-accounting counters.
pub struct LmdbEnvironment {
    env: Env,
    pub(crate) boxes_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    schedule: StorageSchedule,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// On first creation the winner singletons are initialized to
    /// `{0, empty}` and the reserve counters to zero; reopening an existing
    /// environment leaves all state untouched.
    pub fn open(
        path: &Path,
        schedule: StorageSchedule,
        map_size: usize,
    ) -> Result<Self, StoreError> {
        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(2);
        let env = unsafe { options.open(path) }.map_err(LmdbError::from)?;

        let mut wtxn = env.write_txn().map_err(LmdbError::from)?;
        let boxes_db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, Some("boxes"))
            .map_err(LmdbError::from)?;
        let meta_db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, Some("meta"))
            .map_err(LmdbError::from)?;

        let initialized = meta_db
            .get(&wtxn, keys::WINNING_VOTES_KEY)
            .map_err(LmdbError::from)?
            .is_some();
        if !initialized {
            meta_db
                .put(&mut wtxn, keys::WINNING_VOTES_KEY, &0u64.to_be_bytes())
                .map_err(LmdbError::from)?;
            meta_db
                .put(&mut wtxn, keys::WINNING_PROPOSAL_KEY, &[])
                .map_err(LmdbError::from)?;
            meta_db
                .put(&mut wtxn, BOX_COUNT_KEY, &0u64.to_be_bytes())
                .map_err(LmdbError::from)?;
            meta_db
                .put(&mut wtxn, BOX_BYTES_KEY, &0u64.to_be_bytes())
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(Self {
            env,
            boxes_db,
            meta_db,
            schedule,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn schedule(&self) -> &StorageSchedule {
        &self.schedule
    }
}
