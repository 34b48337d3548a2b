//! The minting capability the DAO delegates to at finalization.

use curio_types::AssetId;
use thiserror::Error;

use crate::proposal::Proposal;

/// The minting authority rejected the asset creation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("minting failed: {0}")]
pub struct MintingError(pub String);

/// A capability that converts a winning proposal into an issued asset.
///
/// Injected into [`DaoEngine::finalize`](crate::DaoEngine::finalize) rather
/// than looked up, so deployments choose the authority and tests substitute
/// their own.
///
/// Implementations issue an asset with the proposal's creation parameters
/// and a total supply of exactly 1, returning the new asset's identifier.
pub trait MintingAuthority {
    fn mint(&self, proposal: &Proposal) -> Result<AssetId, MintingError>;
}
