//! Core DAO engine — proposal registry, voting protocol, finalization.
//!
//! Every operation is a single atomic state transition: it runs inside one
//! store transaction, fails synchronously with no side effects, and commits
//! all of its writes or none of them. The store serializes writers, which
//! makes the read-increment-write of a shared vote count and the
//! compare-and-set of the winner pointer linearizable, and guarantees that
//! two concurrent ballots from the same voter can never both pass the
//! ballot-guard check.

use curio_store::{DaoStore, DaoTxn, StoreError, WinnerEntry};
use curio_types::{AccountId, Amount, AssetId, Payment, ProposalKey};
use tracing::{debug, info};

use crate::error::GovernanceError;
use crate::minting::MintingAuthority;
use crate::proposal::Proposal;

/// The DAO: proposal registry, vote tally, ballot guard, and winner pointer,
/// all backed by a single store.
pub struct DaoEngine<S> {
    store: S,
    /// The DAO's own account, the required beneficiary of funding payments.
    system: AccountId,
}

impl<S: DaoStore> DaoEngine<S> {
    pub fn new(store: S, system: AccountId) -> Self {
        Self { store, system }
    }

    pub fn system(&self) -> &AccountId {
        &self.system
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a proposal at (proposer, proposal_id).
    ///
    /// The payment must designate the DAO as beneficiary and cover the
    /// marginal reserve increase of the new proposal box, measured inside
    /// the same transaction that stages the write. Underfunding aborts the
    /// transaction: a rejected proposal is never partially visible.
    /// Overfunding is accepted; nothing is refunded.
    pub fn submit_proposal(
        &self,
        proposer: &AccountId,
        proposal_id: u64,
        proposal: &Proposal,
        funding: &Payment,
    ) -> Result<ProposalKey, GovernanceError> {
        if funding.receiver != self.system {
            return Err(GovernanceError::FundingNotForSystem);
        }

        let key = ProposalKey::new(*proposer, proposal_id);
        let data = encode_proposal(proposal)?;

        let mut txn = self.store.begin()?;
        let before = txn.reserve_requirement()?;
        if txn.proposal_exists(&key)? {
            return Err(GovernanceError::DuplicateProposal(key));
        }
        txn.put_proposal(&key, &data)?;
        let after = txn.reserve_requirement()?;

        let required = after.saturating_sub(before);
        if funding.amount < required {
            return Err(GovernanceError::InsufficientFunding {
                required,
                provided: funding.amount,
            });
        }
        txn.commit()?;

        debug!(%key, funded = %funding.amount, "proposal registered");
        Ok(key)
    }

    /// Reserve cost a submission at `key` would have to fund.
    ///
    /// Computed by staging the write in a throwaway transaction and
    /// measuring the requirement delta; the transaction is dropped, so
    /// nothing is committed.
    pub fn submission_cost(
        &self,
        key: &ProposalKey,
        proposal: &Proposal,
    ) -> Result<Amount, GovernanceError> {
        let data = encode_proposal(proposal)?;
        let mut txn = self.store.begin()?;
        if txn.proposal_exists(key)? {
            return Err(GovernanceError::DuplicateProposal(*key));
        }
        let before = txn.reserve_requirement()?;
        txn.put_proposal(key, &data)?;
        let after = txn.reserve_requirement()?;
        Ok(after.saturating_sub(before))
    }

    /// Fetch the proposal stored at `key`.
    pub fn get_proposal(&self, key: &ProposalKey) -> Result<Proposal, GovernanceError> {
        let data = match self.store.get_proposal(key) {
            Ok(data) => data,
            Err(StoreError::NotFound(_)) => return Err(GovernanceError::ProposalNotFound(*key)),
            Err(e) => return Err(e.into()),
        };
        decode_proposal(&data)
    }

    /// Current vote count for `key` (zero if nobody has voted for it).
    pub fn vote_count(&self, key: &ProposalKey) -> Result<u64, GovernanceError> {
        Ok(self.store.get_votes(key)?.unwrap_or(0))
    }

    /// Whether `voter` has spent their one ballot.
    pub fn has_voted(&self, voter: &AccountId) -> Result<bool, GovernanceError> {
        Ok(self.store.has_voted(voter)?)
    }

    /// Cast `voter`'s single lifetime ballot for `key`.
    ///
    /// The count box is created lazily on the first ballot for a key; this
    /// growth path deliberately carries no funding check (the deployment's
    /// own balance absorbs it). The voted mark is staged last, after the
    /// increment and the winner update, and the whole ballot commits as one
    /// unit. The key is not required to name a submitted proposal; such
    /// ballots tally normally and finalization surfaces the missing record.
    ///
    /// Returns the proposal's new vote count.
    pub fn cast_vote(
        &self,
        voter: &AccountId,
        key: &ProposalKey,
    ) -> Result<u64, GovernanceError> {
        let mut txn = self.store.begin()?;
        if txn.has_voted(voter)? {
            return Err(GovernanceError::AlreadyVoted(*voter));
        }

        let current = match txn.get_votes(key)? {
            Some(count) => count,
            None => {
                txn.put_votes(key, 0)?;
                0
            }
        };
        let total = current.saturating_add(1);
        txn.put_votes(key, total)?;

        let winner = txn.winner()?;
        if total > winner.votes {
            txn.set_winner(&WinnerEntry {
                votes: total,
                proposal: key.encode().to_vec(),
            })?;
        }

        txn.mark_voted(voter)?;
        txn.commit()?;

        debug!(%voter, %key, total, "ballot accepted");
        Ok(total)
    }

    /// Resolve the winner pointer to its proposal.
    ///
    /// A pure read: calling it repeatedly with no intervening votes always
    /// resolves the same proposal.
    pub fn winning_proposal(&self) -> Result<(ProposalKey, Proposal), GovernanceError> {
        let winner = self.store.winner()?;
        if winner.is_empty() {
            return Err(GovernanceError::NoWinner);
        }
        let key = ProposalKey::decode(&winner.proposal)
            .map_err(|e| GovernanceError::Store(StoreError::Corruption(e.to_string())))?;
        let proposal = self.get_proposal(&key)?;
        Ok((key, proposal))
    }

    /// Mint the winning proposal through the given authority and return the
    /// new asset's identifier.
    pub fn finalize(&self, minter: &dyn MintingAuthority) -> Result<AssetId, GovernanceError> {
        let (key, proposal) = self.winning_proposal()?;
        let asset = minter.mint(&proposal)?;
        info!(%key, %asset, "winning proposal minted");
        Ok(asset)
    }
}

fn encode_proposal(proposal: &Proposal) -> Result<Vec<u8>, GovernanceError> {
    bincode::serialize(proposal).map_err(|e| GovernanceError::Serialization(e.to_string()))
}

fn decode_proposal(data: &[u8]) -> Result<Proposal, GovernanceError> {
    bincode::deserialize(data).map_err(|e| GovernanceError::Serialization(e.to_string()))
}
