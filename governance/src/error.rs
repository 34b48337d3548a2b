use curio_store::StoreError;
use curio_types::{AccountId, Amount, ProposalKey};
use thiserror::Error;

use crate::minting::MintingError;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalKey),

    #[error("insufficient funding: need {required}, got {provided}")]
    InsufficientFunding { required: Amount, provided: Amount },

    #[error("funding payment does not designate the DAO as beneficiary")]
    FundingNotForSystem,

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalKey),

    #[error("account {0} has already voted")]
    AlreadyVoted(AccountId),

    #[error("no vote has been cast yet, there is no winner to finalize")]
    NoWinner,

    #[error(transparent)]
    Minting(#[from] MintingError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
