//! Asset proposals.

use curio_types::{AccountId, MetadataHash};
use serde::{Deserialize, Serialize};

/// An asset proposal.
///
/// Immutable once submitted: the registry writes a proposal exactly once per
/// proposal key and never overwrites or removes it. The fields are the
/// creation parameters the minting authority needs if this proposal wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Where the asset content lives.
    pub url: String,
    /// Digest of the content behind `url`.
    pub metadata_hash: MetadataHash,
    /// Display name of the asset.
    pub name: String,
    /// Short unit symbol.
    pub unit_name: String,
    /// Account designated as the asset's reserve.
    pub reserve: AccountId,
}
