//! LMDB storage backend for the Curio DAO.
//!
//! Implements the storage traits from `curio-store` using the `heed` LMDB
//! bindings. All boxes live in one database; the winner singletons and the
//! reserve-accounting counters live in a metadata database. Every mutation
//! goes through a single LMDB write transaction, so commits are
//! all-or-nothing and a dropped transaction rolls back.

pub mod environment;
pub mod error;
pub mod store;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use store::LmdbDaoStore;
