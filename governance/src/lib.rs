//! DAO core for the Curio protocol.
//!
//! Accounts submit asset proposals, funding the storage they allocate. Each
//! account may cast exactly one vote in the DAO's lifetime; a winner pointer
//! tracks the leading proposal as ballots land. Finalization hands the
//! winning proposal to an injected minting authority, which issues a
//! single-supply asset and returns its identifier.
//!
//! Key principle: one account = one vote, forever. The ballot guard is
//! global, not per-proposal.

pub mod engine;
pub mod error;
pub mod minting;
pub mod proposal;

pub use engine::DaoEngine;
pub use error::GovernanceError;
pub use minting::{MintingAuthority, MintingError};
pub use proposal::Proposal;
