//! Fundamental types for the Curio DAO.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identifiers, amounts, hashes, proposal keys, payments,
//! and the storage reserve schedule.

pub mod account;
pub mod amount;
pub mod asset;
pub mod hash;
pub mod params;
pub mod payment;
pub mod proposal_key;

mod hex;

pub use account::AccountId;
pub use amount::Amount;
pub use asset::AssetId;
pub use hash::MetadataHash;
pub use params::StorageSchedule;
pub use payment::Payment;
pub use proposal_key::{KeyDecodeError, ProposalKey};
