// Path: crates/services/src/module/tests/mod.rs

use super::*;
use crate::nonce::{get_chain_nonces, get_nonce_to_cctx};
use crate::observer::ballot::get_ballot;
use crate::observer::mapper::get_observer_mapper;
use crate::observer::observation::observation_ballot_index;
use crate::tss::{get_keygen, get_tss};
use parity_scale_codec::Encode;
use xchain_api::state::InMemoryState;
use xchain_test_utils::fixtures::{account, accounts, blame, genesis, grantee_pubkey};
use xchain_test_utils::mocks::MockValidatorOracle;
use xchain_test_utils::{assert_err_kind, assert_ok};
use xchain_types::app::{
    AccountId, AdminPolicy, BallotStatus, Dec, KeygenStatus, ObservationType,
    ObserverUpdateReason, PolicyType, VoteType,
};
use xchain_types::error::ErrorKind;

const ETH: ChainId = 1;

struct Harness {
    service: CrosschainService,
    state: InMemoryState,
    observers: Vec<AccountId>,
}

impl Harness {
    fn new(retention: u64) -> Self {
        let observers = accounts(1, 4);
        let mut config = CoreConfig {
            admin_policies: vec![
                AdminPolicy {
                    address: admin(),
                    policy_type: PolicyType::Group1,
                },
                AdminPolicy {
                    address: admin(),
                    policy_type: PolicyType::Group2,
                },
            ],
            genesis: genesis(&[ETH], &observers, "0.67".parse().unwrap()),
            ..Default::default()
        };
        config.genesis.params.ballot_retention_blocks = retention;
        let mut validators = MockValidatorOracle::with_bonded(&observers);
        validators.register(account(40)).bond(account(40));

        let service = CrosschainService::from_config(&config, Arc::new(validators));
        let mut state = InMemoryState::new();
        service.init_genesis(&mut state, &config.genesis).unwrap();
        Self {
            service,
            state,
            observers,
        }
    }

    fn call<P: Encode>(&mut self, method: &str, params: &P, height: u64, signer: AccountId) -> Result<(), TransactionError> {
        self.service.handle_service_call(
            &mut self.state,
            method,
            &params.encode(),
            &TxContext::new(height, signer),
        )
    }
}

fn admin() -> AccountId {
    account(99)
}

fn inbound(digest: &[u8]) -> VoteObservationParams {
    VoteObservationParams {
        chain_id: ETH,
        observation_type: ObservationType::InBoundTx,
        digest: digest.to_vec(),
        vote: VoteType::SuccessObservation,
    }
}

#[test]
fn unknown_method_and_bad_params_are_rejected() {
    let mut h = Harness::new(0);
    let signer = h.observers[0];
    assert_err_kind!(h.call("mint@v1", &(), 1, signer), ErrorKind::InvalidRequest);
    let err = assert_err_kind!(
        h.service.handle_service_call(&mut h.state, "vote_observation@v1", &[0xff], &TxContext::new(1, signer)),
        ErrorKind::Internal
    );
    assert!(matches!(err, TransactionError::Deserialization(_)));
    assert_eq!(h.service.id(), "crosschain");
    assert!(h.service.as_on_end_block().is_some());
}

#[test]
fn observation_votes_finalize_through_dispatch() {
    let mut h = Harness::new(0);
    let observers = h.observers.clone();
    for voter in &observers[..3] {
        assert_ok!(h.call("vote_observation@v1", &inbound(b"tx-1"), 5, *voter));
    }
    let index = observation_ballot_index(ETH, ObservationType::InBoundTx, b"tx-1");
    let ballot = get_ballot(&h.state, &index).unwrap().unwrap();
    assert_eq!(ballot.ballot_status, BallotStatus::FinalizedSuccess);

    assert_err_kind!(
        h.call("vote_observation@v1", &inbound(b"tx-1"), 6, observers[3]),
        ErrorKind::NotFound
    );
    assert_err_kind!(
        h.call("vote_observation@v1", &inbound(b"tx-2"), 6, account(70)),
        ErrorKind::Unauthorized
    );
}

#[test]
fn outbound_nonces_through_dispatch() {
    let mut h = Harness::new(0);
    let observer = h.observers[1];
    let allocate = AllocateNoncesParams {
        chain_id: ETH,
        tss_pubkey: "tss-genesis".into(),
        count: 2,
    };
    assert_err_kind!(h.call("allocate_nonces@v1", &allocate, 3, account(70)), ErrorKind::Unauthorized);
    assert_ok!(h.call("allocate_nonces@v1", &allocate, 3, observer));

    for nonce in [1u64, 0] {
        let finalize = FinalizeNonceParams {
            chain_id: ETH,
            nonce,
            cctx_index: format!("cctx-{}", nonce),
        };
        assert_ok!(h.call("finalize_nonce@v1", &finalize, 4, observer));
    }
    assert_eq!(get_chain_nonces(&h.state, ETH).unwrap().unwrap().nonce, 2);
    assert_eq!(
        get_nonce_to_cctx(&h.state, ETH, 1).unwrap().unwrap().cctx_index,
        "cctx-1"
    );

    let again = FinalizeNonceParams {
        chain_id: ETH,
        nonce: 0,
        cctx_index: "dup".into(),
    };
    assert_err_kind!(h.call("finalize_nonce@v1", &again, 5, observer), ErrorKind::AlreadyBound);

    let unreserved = FinalizeNonceParams {
        chain_id: ETH,
        nonce: 7,
        cctx_index: "late".into(),
    };
    assert_err_kind!(h.call("finalize_nonce@v1", &unreserved, 5, observer), ErrorKind::NotFound);
}

#[test]
fn admin_flows_through_dispatch() {
    let mut h = Harness::new(0);
    let observers = h.observers.clone();

    let flags = UpdateCrosschainFlagsParams {
        flags: xchain_types::app::CrosschainFlags {
            is_inbound_enabled: false,
            is_outbound_enabled: true,
        },
    };
    assert_err_kind!(
        h.call("update_crosschain_flags@v1", &flags, 2, observers[0]),
        ErrorKind::Unauthorized
    );
    assert_ok!(h.call("update_crosschain_flags@v1", &flags, 2, admin()));
    assert_err_kind!(
        h.call("vote_observation@v1", &inbound(b"tx"), 3, observers[0]),
        ErrorKind::InvalidRequest
    );

    let update = UpdateObserverParams {
        old_observer_address: observers[0],
        new_observer_address: account(40),
        update_reason: ObserverUpdateReason::AdminUpdate,
    };
    assert_ok!(h.call("update_observer@v1", &update, 4, admin()));
    let list = get_observer_mapper(&h.state, ETH).unwrap().unwrap().observer_list;
    assert_eq!(list[0], account(40));
}

#[test]
fn keygen_round_through_dispatch() {
    let mut h = Harness::new(0);
    let observers = h.observers.clone();
    let request = RequestKeygenParams {
        grantee_pubkeys: observers.iter().map(grantee_pubkey).collect(),
        block_number: 50,
    };
    assert_ok!(h.call("request_keygen@v1", &request, 10, admin()));

    let vote = VoteTssParams {
        tss_pubkey: "tss-two".into(),
        keygen_zeta_height: 50,
        status: KeygenStatus::KeyGenSuccess,
        blame_index: String::new(),
        failure_reason: String::new(),
        nodes: Vec::new(),
    };
    for op in &observers {
        assert_ok!(h.call("vote_tss@v1", &vote, 51, *op));
    }
    assert_eq!(get_tss(&h.state).unwrap().unwrap().tss_pubkey, "tss-two");

    let begin = BeginMigrationParams {
        chain_id: ETH,
        migration_cctx_index: "move-funds".into(),
    };
    assert_ok!(h.call("begin_migration@v1", &begin, 52, admin()));
    assert_ok!(h.call(
        "complete_migration@v1",
        &CompleteMigrationParams { chain_id: ETH },
        53,
        observers[0]
    ));
}

#[test]
fn failed_handlers_leave_no_writes() {
    let mut h = Harness::new(0);
    let observers = h.observers.clone();
    let request = RequestKeygenParams {
        grantee_pubkeys: observers.iter().map(grantee_pubkey).collect(),
        block_number: 50,
    };
    h.call("request_keygen@v1", &request, 10, admin()).unwrap();
    // The blame this round would record already exists.
    crate::tss::add_blame(&mut h.state, &blame(50, "b1", vec![])).unwrap();

    let failing = VoteTssParams {
        tss_pubkey: String::new(),
        keygen_zeta_height: 50,
        status: KeygenStatus::KeyGenFailed,
        blame_index: "b1".into(),
        failure_reason: "timeout".into(),
        nodes: vec!["secp-x".into()],
    };
    let before = h.state.clone();
    assert_err_kind!(h.call("vote_tss@v1", &failing, 51, observers[0]), ErrorKind::AlreadyExists);

    assert_eq!(get_keygen(&h.state).unwrap().unwrap().status, KeygenStatus::PendingKeygen);
    assert_eq!(h.state.len(), before.len());
    let index = crate::observer::ballot::ballot_index(ObservationType::TssKeyGen, &[&50u64.to_be_bytes(), b""]);
    assert!(get_ballot(&h.state, &index).unwrap().is_none());
}

#[test]
fn end_block_prunes_old_finalized_ballots() {
    let mut h = Harness::new(10);
    let observers = h.observers.clone();
    for voter in &observers[..3] {
        h.call("vote_observation@v1", &inbound(b"old"), 5, *voter).unwrap();
    }
    let index = observation_ballot_index(ETH, ObservationType::InBoundTx, b"old");

    h.service.on_end_block(&mut h.state, &TxContext::new(15, admin())).unwrap();
    assert!(get_ballot(&h.state, &index).unwrap().is_some());
    h.service.on_end_block(&mut h.state, &TxContext::new(16, admin())).unwrap();
    assert!(get_ballot(&h.state, &index).unwrap().is_none());
}

#[test]
fn zero_retention_keeps_ballots() {
    let mut h = Harness::new(0);
    let observers = h.observers.clone();
    for voter in &observers[..3] {
        h.call("vote_observation@v1", &inbound(b"keep"), 5, *voter).unwrap();
    }
    h.service.on_end_block(&mut h.state, &TxContext::new(1_000, admin())).unwrap();
    let index = observation_ballot_index(ETH, ObservationType::InBoundTx, b"keep");
    assert!(get_ballot(&h.state, &index).unwrap().is_some());
}

#[test]
fn service_is_built_from_toml() {
    let doc = format!(
        r#"
[[admin_policies]]
address = "{admin}"
policy_type = "group1"

[genesis.params]
ballot_threshold = "1.0"
supported_chains = [{{ chain_id = 1, chain_name = "eth" }}]

[[genesis.observer_mappers]]
observer_chain = {{ chain_id = 1, chain_name = "eth" }}
observer_list = ["{obs}"]
"#,
        admin = "63".repeat(32),
        obs = "01".repeat(32),
    );
    let config = CoreConfig::from_toml_str(&doc).unwrap();
    let service = CrosschainService::from_config(&config, Arc::new(MockValidatorOracle::new()));
    let mut state = InMemoryState::new();
    service.init_genesis(&mut state, &config.genesis).unwrap();

    let flags = UpdateCrosschainFlagsParams {
        flags: xchain_types::app::CrosschainFlags {
            is_inbound_enabled: true,
            is_outbound_enabled: false,
        },
    };
    assert_ok!(service.handle_service_call(
        &mut state,
        "update_crosschain_flags@v1",
        &flags.encode(),
        &TxContext::new(1, account(0x63))
    ));
    assert_eq!(Dec::ONE, crate::observer::get_params(&state).unwrap().ballot_threshold);
}
