//! Abstract storage for the Curio DAO.
//!
//! Every storage backend (LMDB, in-memory for testing) implements the traits
//! in [`dao`]. The rest of the workspace depends only on the traits.

pub mod dao;
pub mod error;
pub mod keys;
pub mod memory;

pub use dao::{DaoStore, DaoTxn, WinnerEntry};
pub use error::StoreError;
pub use memory::MemoryDaoStore;
