//! End-to-end DAO flow against the LMDB backend: submit, vote, finalize, mint.

use curio_governance::{DaoEngine, GovernanceError, Proposal};
use curio_minter::AssetMinter;
use curio_store::DaoStore;
use curio_store_lmdb::LmdbDaoStore;
use curio_types::{AccountId, AssetId, MetadataHash, Payment, ProposalKey, StorageSchedule};

fn acct(seed: u8) -> AccountId {
    AccountId::new([seed; 32])
}

const SYSTEM: u8 = 0xEE;

fn open_dao(dir: &tempfile::TempDir) -> DaoEngine<LmdbDaoStore> {
    let store = LmdbDaoStore::open(dir.path(), StorageSchedule::default(), 10 * 1024 * 1024)
        .expect("failed to open store");
    DaoEngine::new(store, acct(SYSTEM))
}

fn gallery_proposal() -> Proposal {
    Proposal {
        url: "ipfs://bafy-curio-gallery-piece".into(),
        metadata_hash: MetadataHash::digest(b"curio gallery piece"),
        name: "Curio Gallery #1".into(),
        unit_name: "CURIO".into(),
        reserve: acct(1),
    }
}

#[test]
fn submit_vote_and_mint_the_winner() {
    let dir = tempfile::tempdir().unwrap();
    let dao = open_dao(&dir);

    // Proposer A submits at slot 0 with exactly the required funding.
    let proposal = gallery_proposal();
    let key = ProposalKey::new(acct(1), 0);
    let cost = dao.submission_cost(&key, &proposal).unwrap();
    let payment = Payment::new(acct(1), acct(SYSTEM), cost);
    let key = dao.submit_proposal(&acct(1), 0, &proposal, &payment).unwrap();

    // Two voters back it; the winner pointer follows each strict improvement.
    assert_eq!(dao.cast_vote(&acct(10), &key).unwrap(), 1);
    let winner = dao.store().winner().unwrap();
    assert_eq!((winner.votes, winner.proposal.clone()), (1, key.encode().to_vec()));

    assert_eq!(dao.cast_vote(&acct(11), &key).unwrap(), 2);
    let winner = dao.store().winner().unwrap();
    assert_eq!((winner.votes, winner.proposal.clone()), (2, key.encode().to_vec()));

    // The first voter's second ballot fails, for any key.
    let err = dao.cast_vote(&acct(10), &key).unwrap_err();
    assert!(matches!(err, GovernanceError::AlreadyVoted(v) if v == acct(10)));
    assert_eq!(dao.vote_count(&key).unwrap(), 2);

    // Finalization resolves the winner and mints a single-supply asset.
    let minter = AssetMinter::new();
    let asset = dao.finalize(&minter).unwrap();
    assert_eq!(asset, AssetId::new(1));

    let config = minter.asset(asset).unwrap();
    assert_eq!(config.name, proposal.name);
    assert_eq!(config.unit_name, proposal.unit_name);
    assert_eq!(config.url, proposal.url);
    assert_eq!(config.metadata_hash, proposal.metadata_hash);
    assert_eq!(config.reserve, proposal.reserve);
    assert_eq!(config.total, 1);
}

#[test]
fn competing_proposals_resolve_to_the_strict_leader() {
    let dir = tempfile::tempdir().unwrap();
    let dao = open_dao(&dir);

    let mut keys = Vec::new();
    for proposer in [1u8, 2] {
        let proposal = Proposal {
            url: format!("ipfs://entry-{proposer}"),
            metadata_hash: MetadataHash::digest(&[proposer]),
            name: format!("Entry #{proposer}"),
            unit_name: "CURIO".into(),
            reserve: acct(proposer),
        };
        let key = ProposalKey::new(acct(proposer), 0);
        let cost = dao.submission_cost(&key, &proposal).unwrap();
        let payment = Payment::new(acct(proposer), acct(SYSTEM), cost);
        keys.push(dao.submit_proposal(&acct(proposer), 0, &proposal, &payment).unwrap());
    }

    // 1 vote for the first entry, then 2 for the second.
    dao.cast_vote(&acct(10), &keys[0]).unwrap();
    dao.cast_vote(&acct(11), &keys[1]).unwrap();
    dao.cast_vote(&acct(12), &keys[1]).unwrap();

    let (winning_key, winning) = dao.winning_proposal().unwrap();
    assert_eq!(winning_key, keys[1]);
    assert_eq!(winning.name, "Entry #2");

    // Finalization is a deterministic read: minting twice issues two assets
    // from the same winning proposal.
    let minter = AssetMinter::new();
    let first = dao.finalize(&minter).unwrap();
    let second = dao.finalize(&minter).unwrap();
    assert_ne!(first, second);
    assert_eq!(minter.asset(first).unwrap().name, "Entry #2");
    assert_eq!(minter.asset(second).unwrap().name, "Entry #2");
}
