//! In-process minting authority.
//!
//! The counterpart of the DAO's finalization step: takes a winning proposal
//! and issues a single-supply asset from its creation parameters, assigning
//! sequential identifiers. Real deployments would route this to a chain's
//! asset-configuration primitive; the issuer here keeps the configuration of
//! every asset it has created and enforces the field limits such a primitive
//! would impose.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use curio_governance::{MintingAuthority, MintingError, Proposal};
use curio_types::{AccountId, AssetId, MetadataHash};

/// Field limits enforced at asset creation.
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_UNIT_NAME_LEN: usize = 8;
pub const MAX_URL_LEN: usize = 96;

#[derive(Debug, Error)]
pub enum MintError {
    #[error("asset name exceeds {MAX_NAME_LEN} bytes")]
    NameTooLong,

    #[error("unit name exceeds {MAX_UNIT_NAME_LEN} bytes")]
    UnitNameTooLong,

    #[error("asset url exceeds {MAX_URL_LEN} bytes")]
    UrlTooLong,

    #[error("minter state is poisoned")]
    Poisoned,
}

/// Creation parameters of an issued asset.
///
/// `total` is always 1: the minter issues collectibles, not fungible supply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetConfig {
    pub name: String,
    pub unit_name: String,
    pub url: String,
    pub metadata_hash: MetadataHash,
    pub reserve: AccountId,
    pub total: u64,
}

struct MinterInner {
    next_id: u64,
    assets: HashMap<AssetId, AssetConfig>,
}

/// An asset issuer implementing [`MintingAuthority`].
///
/// Identifiers start at 1 and increase by one per issued asset; 0 is never
/// assigned.
pub struct AssetMinter {
    inner: Mutex<MinterInner>,
}

impl AssetMinter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MinterInner {
                next_id: 1,
                assets: HashMap::new(),
            }),
        }
    }

    /// Issue a single-supply asset from the proposal's creation parameters.
    pub fn mint_asset(&self, proposal: &Proposal) -> Result<AssetId, MintError> {
        if proposal.name.len() > MAX_NAME_LEN {
            return Err(MintError::NameTooLong);
        }
        if proposal.unit_name.len() > MAX_UNIT_NAME_LEN {
            return Err(MintError::UnitNameTooLong);
        }
        if proposal.url.len() > MAX_URL_LEN {
            return Err(MintError::UrlTooLong);
        }

        let mut inner = self.inner.lock().map_err(|_| MintError::Poisoned)?;
        let id = AssetId::new(inner.next_id);
        inner.next_id += 1;
        inner.assets.insert(
            id,
            AssetConfig {
                name: proposal.name.clone(),
                unit_name: proposal.unit_name.clone(),
                url: proposal.url.clone(),
                metadata_hash: proposal.metadata_hash,
                reserve: proposal.reserve,
                total: 1,
            },
        );
        debug!(asset = %id, name = %proposal.name, "asset issued");
        Ok(id)
    }

    /// Configuration of a previously issued asset.
    pub fn asset(&self, id: AssetId) -> Option<AssetConfig> {
        self.inner.lock().ok()?.assets.get(&id).cloned()
    }

    /// Number of assets issued so far.
    pub fn issued(&self) -> usize {
        self.inner.lock().map(|inner| inner.assets.len()).unwrap_or(0)
    }
}

impl Default for AssetMinter {
    fn default() -> Self {
        Self::new()
    }
}

impl MintingAuthority for AssetMinter {
    fn mint(&self, proposal: &Proposal) -> Result<AssetId, MintingError> {
        self.mint_asset(proposal)
            .map_err(|e| MintingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(name: &str, unit: &str, url: &str) -> Proposal {
        Proposal {
            url: url.into(),
            metadata_hash: MetadataHash::digest(url.as_bytes()),
            name: name.into(),
            unit_name: unit.into(),
            reserve: AccountId::new([3u8; 32]),
        }
    }

    #[test]
    fn assigns_sequential_ids_from_one() {
        let minter = AssetMinter::new();
        let a = minter.mint_asset(&proposal("One", "ONE", "ipfs://a")).unwrap();
        let b = minter.mint_asset(&proposal("Two", "TWO", "ipfs://b")).unwrap();
        assert_eq!(a, AssetId::new(1));
        assert_eq!(b, AssetId::new(2));
        assert_eq!(minter.issued(), 2);
    }

    #[test]
    fn records_config_with_single_supply() {
        let minter = AssetMinter::new();
        let p = proposal("Curio #1", "CURIO", "ipfs://curio-1");
        let id = minter.mint_asset(&p).unwrap();

        let config = minter.asset(id).unwrap();
        assert_eq!(config.name, p.name);
        assert_eq!(config.unit_name, p.unit_name);
        assert_eq!(config.url, p.url);
        assert_eq!(config.metadata_hash, p.metadata_hash);
        assert_eq!(config.reserve, p.reserve);
        assert_eq!(config.total, 1);
    }

    #[test]
    fn unknown_asset_is_none() {
        let minter = AssetMinter::new();
        assert_eq!(minter.asset(AssetId::new(42)), None);
    }

    #[test]
    fn rejects_oversized_fields() {
        let minter = AssetMinter::new();

        let long_name = proposal(&"n".repeat(MAX_NAME_LEN + 1), "OK", "ipfs://x");
        assert!(matches!(
            minter.mint_asset(&long_name),
            Err(MintError::NameTooLong)
        ));

        let long_unit = proposal("Ok", &"u".repeat(MAX_UNIT_NAME_LEN + 1), "ipfs://x");
        assert!(matches!(
            minter.mint_asset(&long_unit),
            Err(MintError::UnitNameTooLong)
        ));

        let long_url = proposal("Ok", "OK", &"u".repeat(MAX_URL_LEN + 1));
        assert!(matches!(
            minter.mint_asset(&long_url),
            Err(MintError::UrlTooLong)
        ));

        // Nothing was issued.
        assert_eq!(minter.issued(), 0);
    }

    #[test]
    fn authority_error_carries_the_reason() {
        let minter = AssetMinter::new();
        let bad = proposal(&"n".repeat(MAX_NAME_LEN + 1), "OK", "ipfs://x");
        let err = MintingAuthority::mint(&minter, &bad).unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
