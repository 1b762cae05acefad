// Path: crates/services/src/tss/tests/mod.rs

use super::*;
use crate::genesis::init_genesis;
use crate::nonce::{allocate_range, authorized_signer, get_pending_nonces};
use xchain_api::oracle::StaticPolicyOracle;
use xchain_api::state::InMemoryState;
use xchain_test_utils::fixtures::{account, accounts, genesis, grantee_pubkey, node_account, tss};
use xchain_test_utils::{assert_err_kind, assert_ok};
use xchain_types::error::ErrorKind;

const ETH: ChainId = 1;
const KEYGEN_BLOCK: u64 = 100;

fn admin() -> AccountId {
    account(99)
}

fn policies() -> StaticPolicyOracle {
    let mut p = StaticPolicyOracle::default();
    p.grant(admin(), PolicyType::Group1);
    p.grant(admin(), PolicyType::Group2);
    p
}

fn seeded(observers: &[AccountId]) -> InMemoryState {
    let mut state = InMemoryState::new();
    init_genesis(&mut state, &genesis(&[ETH], observers, Dec::from_ratio(2, 3))).unwrap();
    state
}

fn success(pubkey: &str) -> VoteTssParams {
    VoteTssParams {
        tss_pubkey: pubkey.to_string(),
        keygen_zeta_height: KEYGEN_BLOCK,
        status: KeygenStatus::KeyGenSuccess,
        blame_index: String::new(),
        failure_reason: String::new(),
        nodes: Vec::new(),
    }
}

fn failure(blame_index: &str) -> VoteTssParams {
    VoteTssParams {
        tss_pubkey: String::new(),
        keygen_zeta_height: KEYGEN_BLOCK,
        status: KeygenStatus::KeyGenFailed,
        blame_index: blame_index.to_string(),
        failure_reason: "party timed out".to_string(),
        nodes: vec!["secp-bad".to_string()],
    }
}

fn request(state: &mut InMemoryState, participants: &[AccountId]) {
    let pubkeys = participants.iter().map(grantee_pubkey).collect();
    assert_ok!(request_keygen(
        state,
        &policies(),
        &TxContext::new(10, admin()),
        pubkeys,
        KEYGEN_BLOCK
    ));
}

#[test]
fn keygen_requests_are_gated() {
    let mut state = seeded(&accounts(1, 3));
    let keys = vec!["secp-a".to_string()];

    assert_err_kind!(
        request_keygen(&mut state, &policies(), &TxContext::new(10, account(1)), keys.clone(), 50),
        ErrorKind::Unauthorized
    );
    assert_err_kind!(
        request_keygen(&mut state, &policies(), &TxContext::new(10, admin()), Vec::new(), 50),
        ErrorKind::InvalidRequest
    );
    assert_err_kind!(
        request_keygen(&mut state, &policies(), &TxContext::new(10, admin()), keys.clone(), 10),
        ErrorKind::InvalidRequest
    );
    assert_ok!(request_keygen(
        &mut state,
        &policies(),
        &TxContext::new(10, admin()),
        keys.clone(),
        50
    ));
    assert_err_kind!(
        request_keygen(&mut state, &policies(), &TxContext::new(11, admin()), keys, 60),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn unanimous_success_activates_the_new_key() {
    let observers = accounts(1, 4);
    let participants = &observers[..3];
    let mut state = seeded(&observers);
    request(&mut state, participants);

    // An operator outside the grantee list cannot vote.
    assert_err_kind!(
        vote_tss(&mut state, &TxContext::new(11, observers[3]), success("tss-next")),
        ErrorKind::VoterNotEligible
    );

    let mut statuses = Vec::new();
    for op in participants {
        statuses.push(assert_ok!(vote_tss(
            &mut state,
            &TxContext::new(12, *op),
            success("tss-next")
        )));
    }
    assert_eq!(
        statuses,
        vec![
            BallotStatus::InProgress,
            BallotStatus::InProgress,
            BallotStatus::FinalizedSuccess
        ]
    );

    let active = get_tss(&state).unwrap().unwrap();
    assert_eq!(active.tss_pubkey, "tss-next");
    assert_eq!(active.finalized_zeta_height, 12);
    assert_eq!(active.keygen_zeta_height, KEYGEN_BLOCK);
    assert_eq!(
        active.tss_participant_list,
        participants.iter().map(grantee_pubkey).collect::<Vec<_>>()
    );
    assert_eq!(get_keygen(&state).unwrap().unwrap().status, KeygenStatus::KeyGenSuccess);

    let history: Vec<String> = get_tss_history(&state)
        .unwrap()
        .into_iter()
        .map(|t| t.tss_pubkey)
        .collect();
    assert_eq!(history, vec!["tss-genesis".to_string(), "tss-next".to_string()]);
    assert_eq!(previous_tss(&state).unwrap().unwrap().tss_pubkey, "tss-genesis");

    assert_err_kind!(
        vote_tss(&mut state, &TxContext::new(13, observers[0]), success("tss-next")),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn a_single_failure_fails_the_round_and_records_blame() {
    let observers = accounts(1, 3);
    let mut state = seeded(&observers);
    request(&mut state, &observers);

    assert_ok!(vote_tss(&mut state, &TxContext::new(11, observers[0]), success("tss-next")));
    let status = assert_ok!(vote_tss(
        &mut state,
        &TxContext::new(11, observers[1]),
        failure("b1")
    ));
    assert_eq!(status, BallotStatus::FinalizedFailure);

    assert_eq!(get_keygen(&state).unwrap().unwrap().status, KeygenStatus::KeyGenFailed);
    assert_eq!(get_tss(&state).unwrap().unwrap().tss_pubkey, "tss-genesis");
    let blame = get_blame(&state, "100-b1").unwrap().unwrap();
    assert_eq!(blame.nodes, vec!["secp-bad".to_string()]);
    assert_eq!(blame.failure_reason, "party timed out");

    // A new round may be requested after the failure.
    request(&mut state, &observers);
}

#[test]
fn tss_vote_preconditions() {
    let observers = accounts(1, 3);
    let mut state = seeded(&observers);

    assert_err_kind!(
        vote_tss(&mut state, &TxContext::new(11, observers[0]), success("k")),
        ErrorKind::NotFound
    );
    request(&mut state, &observers);

    let mut wrong_height = success("k");
    wrong_height.keygen_zeta_height = KEYGEN_BLOCK + 1;
    assert_err_kind!(
        vote_tss(&mut state, &TxContext::new(11, observers[0]), wrong_height),
        ErrorKind::InvalidRequest
    );
    assert_err_kind!(
        vote_tss(&mut state, &TxContext::new(11, account(70)), success("k")),
        ErrorKind::NodeAccountNotFound
    );
    let mut pending = success("k");
    pending.status = KeygenStatus::PendingKeygen;
    assert_err_kind!(
        vote_tss(&mut state, &TxContext::new(11, observers[0]), pending),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn blame_votes_record_once_the_threshold_is_reached() {
    let observers = accounts(1, 3);
    let mut state = seeded(&observers);
    let vote = AddBlameVoteParams {
        chain_id: ETH,
        blame_index: "keysign-7".to_string(),
        failure_reason: "signature timeout".to_string(),
        nodes: vec!["secp-x".to_string()],
    };

    assert_err_kind!(
        add_blame_vote(&mut state, &TxContext::new(20, account(50)), vote.clone()),
        ErrorKind::Unauthorized
    );
    assert_eq!(
        assert_ok!(add_blame_vote(&mut state, &TxContext::new(20, observers[0]), vote.clone())),
        BallotStatus::InProgress
    );
    assert!(get_all_blames(&state).unwrap().is_empty());
    assert_eq!(
        assert_ok!(add_blame_vote(&mut state, &TxContext::new(21, observers[1]), vote.clone())),
        BallotStatus::FinalizedSuccess
    );

    let blame = get_blame(&state, "20-keysign-7").unwrap().unwrap();
    assert_eq!(blame.nodes, vote.nodes);
    assert_err_kind!(add_blame(&mut state, &blame), ErrorKind::AlreadyExists);
}

#[test]
fn migration_lifecycle() {
    let observers = accounts(1, 3);
    let mut gen = genesis(&[ETH], &observers, Dec::ONE);
    gen.tss_history = vec![tss("tss-old", 1), tss("tss-new", 9)];
    gen.tss = Some(tss("tss-new", 9));
    let mut state = InMemoryState::new();
    init_genesis(&mut state, &gen).unwrap();
    let admin_ctx = TxContext::new(30, admin());

    assert_err_kind!(
        begin_migration(&mut state, &policies(), &TxContext::new(30, observers[0]), ETH, "m".into()),
        ErrorKind::Unauthorized
    );
    assert_err_kind!(
        begin_migration(&mut state, &policies(), &admin_ctx, 404, "m".into()),
        ErrorKind::InvalidRequest
    );
    assert_err_kind!(complete_migration(&mut state, &policies(), &admin_ctx, ETH), ErrorKind::NotFound);

    assert_ok!(begin_migration(&mut state, &policies(), &admin_ctx, ETH, "m".into()));
    assert_err_kind!(
        begin_migration(&mut state, &policies(), &admin_ctx, ETH, "m2".into()),
        ErrorKind::AlreadyExists
    );
    assert_eq!(authorized_signer(&state, ETH).unwrap(), "tss-old");
    allocate_range(&mut state, ETH, "tss-old", 4).unwrap();

    assert_err_kind!(
        complete_migration(&mut state, &policies(), &TxContext::new(31, account(60)), ETH),
        ErrorKind::Unauthorized
    );
    assert_ok!(complete_migration(
        &mut state,
        &policies(),
        &TxContext::new(31, observers[2]),
        ETH
    ));

    assert!(get_fund_migrator(&state, ETH).unwrap().is_none());
    assert_eq!(authorized_signer(&state, ETH).unwrap(), "tss-new");
    let window = get_pending_nonces(&state, ETH, "tss-new").unwrap().unwrap();
    assert_eq!((window.nonce_low, window.nonce_high), (0, 4));
    assert!(get_pending_nonces(&state, ETH, "tss-old").unwrap().is_none());
}

#[test]
fn migration_needs_a_previous_key() {
    let mut state = seeded(&accounts(1, 3));
    assert_err_kind!(
        begin_migration(&mut state, &policies(), &TxContext::new(30, admin()), ETH, "m".into()),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn keygen_voters_follow_node_account_keys() {
    let mut state = seeded(&accounts(1, 2));
    crate::observer::node_account::set_node_account(&mut state, &node_account(account(5))).unwrap();
    let keygen = Keygen {
        status: KeygenStatus::PendingKeygen,
        grantee_pubkeys: vec![grantee_pubkey(&account(2)), grantee_pubkey(&account(5))],
        block_number: KEYGEN_BLOCK,
    };
    assert_eq!(keygen_voters(&state, &keygen).unwrap(), vec![account(2), account(5)]);
}
