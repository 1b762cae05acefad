// Path: crates/services/src/observer/tests/mod.rs

use super::ballot::get_ballot;
use super::mapper::{get_observer_mapper, set_observer_mapper, update_observer_list};
use super::node_account::{get_node_account, set_node_account};
use super::observation::{observation_ballot_index, vote_on_observation};
use super::update::update_observer;
use super::*;
use xchain_api::oracle::StaticPolicyOracle;
use xchain_api::state::InMemoryState;
use xchain_test_utils::fixtures::{account, accounts, chain, node_account, observer_mapper};
use xchain_test_utils::mocks::MockValidatorOracle;
use xchain_test_utils::randomness::TestRng;
use xchain_test_utils::{assert_err_kind, assert_ok};
use xchain_types::app::{AccountId, BallotStatus, Dec, ObserverUpdateReason, VoteType};
use xchain_types::error::ErrorKind;

const ETH: i64 = 1;
const BTC: i64 = 8332;

/// Two chains observed by `observers`, node accounts for each, both flows
/// enabled, and an initialized observer count.
fn seeded(observers: &[AccountId], threshold: &str) -> InMemoryState {
    let mut state = InMemoryState::new();
    set_params(
        &mut state,
        &ObserverParams {
            supported_chains: vec![chain(ETH), chain(BTC)],
            ballot_threshold: threshold.parse().unwrap(),
            ballot_retention_blocks: 0,
        },
    )
    .unwrap();
    for id in [ETH, BTC] {
        set_observer_mapper(&mut state, &observer_mapper(id, observers.to_vec())).unwrap();
    }
    for op in observers {
        set_node_account(&mut state, &node_account(*op)).unwrap();
    }
    set_crosschain_flags(&mut state, &CrosschainFlags::default()).unwrap();
    mapper::refresh_last_observer_count(&mut state, 1).unwrap();
    state
}

fn admin_policies(admin: AccountId) -> StaticPolicyOracle {
    let mut policies = StaticPolicyOracle::default();
    policies.grant(admin, PolicyType::Group1);
    policies.grant(admin, PolicyType::Group2);
    policies
}

fn observer_lists(state: &InMemoryState) -> Vec<Vec<AccountId>> {
    [ETH, BTC]
        .iter()
        .map(|id| get_observer_mapper(state, *id).unwrap().unwrap().observer_list)
        .collect()
}

#[test]
fn tombstoned_observer_replaces_itself() {
    let observers = accounts(1, 3);
    let (old, new) = (observers[0], account(40));
    let mut state = seeded(&observers, "0.66");
    let mut validators = MockValidatorOracle::with_bonded(&[old, new]);
    validators.tombstone(&old);

    assert_ok!(update_observer(
        &mut state,
        &validators,
        &StaticPolicyOracle::default(),
        &TxContext::new(20, old),
        &old,
        &new,
        ObserverUpdateReason::Tombstoned,
    ));

    for list in observer_lists(&state) {
        assert_eq!(list, vec![new, observers[1], observers[2]]);
    }
    assert!(get_node_account(&state, &old).unwrap().is_none());
    assert_eq!(get_node_account(&state, &new).unwrap().unwrap().operator, new);
    // Same number of distinct observers, so the count is untouched.
    let count = get_last_observer_count(&state).unwrap().unwrap();
    assert_eq!(count.count, 3);
    assert_eq!(count.last_change_height, 1);
}

#[test]
fn tombstoned_reason_requires_self_submission_and_tombstone() {
    let observers = accounts(1, 3);
    let (old, new) = (observers[0], account(40));
    let state_before = seeded(&observers, "0.66");
    let policies = admin_policies(account(99));

    // Not tombstoned.
    let validators = MockValidatorOracle::with_bonded(&[old, new]);
    let mut state = state_before.clone();
    assert_err_kind!(
        update_observer(
            &mut state,
            &validators,
            &policies,
            &TxContext::new(2, old),
            &old,
            &new,
            ObserverUpdateReason::Tombstoned
        ),
        ErrorKind::UpdateObserver
    );

    // Tombstoned, but submitted by someone else, even an admin.
    let mut validators = MockValidatorOracle::with_bonded(&[old, new]);
    validators.tombstone(&old);
    for creator in [observers[1], account(99)] {
        assert_err_kind!(
            update_observer(
                &mut state,
                &validators,
                &policies,
                &TxContext::new(2, creator),
                &old,
                &new,
                ObserverUpdateReason::Tombstoned
            ),
            ErrorKind::UpdateObserver
        );
    }
    assert_eq!(observer_lists(&state), observer_lists(&state_before));
}

#[test]
fn admin_update_needs_group2_and_ignores_tombstone() {
    let observers = accounts(1, 4);
    let (old, new, admin) = (observers[2], account(50), account(99));
    let policies = admin_policies(admin);

    for tombstoned in [false, true] {
        let mut state = seeded(&observers, "0.66");
        let mut validators = MockValidatorOracle::with_bonded(&[old, new]);
        if tombstoned {
            validators.tombstone(&old);
        }
        assert_ok!(update_observer(
            &mut state,
            &validators,
            &policies,
            &TxContext::new(7, admin),
            &old,
            &new,
            ObserverUpdateReason::AdminUpdate,
        ));
        for list in observer_lists(&state) {
            assert_eq!(list, vec![observers[0], observers[1], new, observers[3]]);
        }
    }
}

#[test]
fn regular_account_cannot_use_admin_update() {
    let observers = accounts(1, 3);
    let (old, new) = (observers[0], account(40));
    let mut state = seeded(&observers, "0.66");
    let mut validators = MockValidatorOracle::with_bonded(&[old, new]);
    validators.tombstone(&old);
    let mut policies = StaticPolicyOracle::default();
    policies.grant(old, PolicyType::Group1);

    assert_err_kind!(
        update_observer(
            &mut state,
            &validators,
            &policies,
            &TxContext::new(2, old),
            &old,
            &new,
            ObserverUpdateReason::AdminUpdate
        ),
        ErrorKind::UpdateObserver
    );
}

#[test]
fn replacement_must_be_bonded_and_old_must_resolve() {
    let observers = accounts(1, 3);
    let (old, new, admin) = (observers[0], account(40), account(99));
    let policies = admin_policies(admin);
    let ctx = TxContext::new(3, admin);
    let mut state = seeded(&observers, "0.66");

    let mut validators = MockValidatorOracle::with_bonded(&[old]);
    validators.register(new);
    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &old, &new, ObserverUpdateReason::AdminUpdate),
        ErrorKind::UpdateObserver
    );

    let mut validators = MockValidatorOracle::with_bonded(&[old, new]);
    validators.remove(&old);
    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &old, &new, ObserverUpdateReason::AdminUpdate),
        ErrorKind::UpdateObserver
    );

    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &new, &new, ObserverUpdateReason::AdminUpdate),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn missing_records_abort_before_any_write() {
    let observers = accounts(1, 3);
    let (old, new, admin) = (observers[0], account(40), account(99));
    let policies = admin_policies(admin);
    let validators = MockValidatorOracle::with_bonded(&[old, new]);
    let ctx = TxContext::new(3, admin);

    let mut state = seeded(&observers, "0.66");
    node_account::remove_node_account(&mut state, &old).unwrap();
    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &old, &new, ObserverUpdateReason::AdminUpdate),
        ErrorKind::NodeAccountNotFound
    );
    assert_eq!(observer_lists(&state)[0], observers);

    let mut state = seeded(&observers, "0.66");
    state.delete(xchain_types::keys::LAST_OBSERVER_COUNT_KEY).unwrap();
    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &old, &new, ObserverUpdateReason::AdminUpdate),
        ErrorKind::LastObserverCountNotFound
    );
    assert_eq!(observer_lists(&state)[0], observers);
    assert!(get_node_account(&state, &old).unwrap().is_some());
}

#[test]
fn tombstoned_self_replacement_needs_both_records() {
    let observers = accounts(1, 3);
    let (old, new) = (observers[0], account(40));
    let mut validators = MockValidatorOracle::with_bonded(&[old, new]);
    validators.tombstone(&old);
    let policies = StaticPolicyOracle::default();
    let ctx = TxContext::new(3, old);

    let mut state = seeded(&observers, "0.66");
    node_account::remove_node_account(&mut state, &old).unwrap();
    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &old, &new, ObserverUpdateReason::Tombstoned),
        ErrorKind::NodeAccountNotFound
    );
    for list in observer_lists(&state) {
        assert_eq!(list, observers);
    }
    assert!(get_node_account(&state, &new).unwrap().is_none());

    let mut state = seeded(&observers, "0.66");
    state.delete(xchain_types::keys::LAST_OBSERVER_COUNT_KEY).unwrap();
    assert_err_kind!(
        update_observer(&mut state, &validators, &policies, &ctx, &old, &new, ObserverUpdateReason::Tombstoned),
        ErrorKind::LastObserverCountNotFound
    );
    for list in observer_lists(&state) {
        assert_eq!(list, observers);
    }
    assert!(get_node_account(&state, &old).unwrap().is_some());
    assert!(get_node_account(&state, &new).unwrap().is_none());
}

#[test]
fn merging_into_an_existing_observer_lowers_the_count() {
    let observers = accounts(1, 3);
    let (old, new, admin) = (observers[0], observers[1], account(99));
    let mut state = seeded(&observers, "0.66");
    node_account::remove_node_account(&mut state, &new).unwrap();
    let validators = MockValidatorOracle::with_bonded(&observers);

    assert_ok!(update_observer(
        &mut state,
        &validators,
        &admin_policies(admin),
        &TxContext::new(12, admin),
        &old,
        &new,
        ObserverUpdateReason::AdminUpdate,
    ));
    // Duplicates are kept in the list; the count is over distinct addresses.
    assert_eq!(observer_lists(&state)[0], vec![new, new, observers[2]]);
    let count = get_last_observer_count(&state).unwrap().unwrap();
    assert_eq!(count.count, 2);
    assert_eq!(count.last_change_height, 12);
}

#[test]
fn list_replacement_scales_with_old_at_the_end() {
    fn numbered(i: u64) -> AccountId {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&i.to_be_bytes());
        AccountId(bytes)
    }
    let new = AccountId([0xff; 32]);
    for size in [1u64, 10, 1_000, 100_000] {
        let mut list: Vec<AccountId> = (0..size).map(numbered).collect();
        let old = numbered(size - 1);
        assert_eq!(update_observer_list(&mut list, &old, &new), 1);
        assert_eq!(list.len() as u64, size);
        assert_eq!(list.last(), Some(&new));
        if size > 1 {
            assert_eq!(list[0], numbered(0));
        }
    }
}

#[test]
fn inbound_observation_finalizes_once() {
    let observers = accounts(1, 4);
    let mut state = seeded(&observers, "0.67");
    let digest = b"deposit-0xabc";

    let mut statuses = Vec::new();
    for voter in &observers[..3] {
        statuses.push(assert_ok!(vote_on_observation(
            &mut state,
            &TxContext::new(5, *voter),
            ETH,
            ObservationType::InBoundTx,
            digest,
            VoteType::SuccessObservation,
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

    assert_err_kind!(
        vote_on_observation(
            &mut state,
            &TxContext::new(6, observers[3]),
            ETH,
            ObservationType::InBoundTx,
            digest,
            VoteType::SuccessObservation,
        ),
        ErrorKind::NotFound
    );

    let index = observation_ballot_index(ETH, ObservationType::InBoundTx, digest);
    let ballot = get_ballot(&state, &index).unwrap().unwrap();
    assert_eq!(ballot.ballot_creation_height, 5);
    assert_eq!(ballot.ballot_threshold, "0.67".parse::<Dec>().unwrap());
    // The same digest on another chain is a different ballot.
    assert_ne!(index, observation_ballot_index(BTC, ObservationType::InBoundTx, digest));
}

#[test]
fn observation_requires_observer_and_known_chain() {
    let observers = accounts(1, 3);
    let mut state = seeded(&observers, "0.66");

    assert_err_kind!(
        vote_on_observation(
            &mut state,
            &TxContext::new(5, account(77)),
            ETH,
            ObservationType::InBoundTx,
            b"d",
            VoteType::SuccessObservation,
        ),
        ErrorKind::Unauthorized
    );
    assert_err_kind!(
        vote_on_observation(
            &mut state,
            &TxContext::new(5, observers[0]),
            12345,
            ObservationType::InBoundTx,
            b"d",
            VoteType::SuccessObservation,
        ),
        ErrorKind::InvalidRequest
    );
    assert_err_kind!(
        vote_on_observation(
            &mut state,
            &TxContext::new(5, observers[0]),
            ETH,
            ObservationType::TssKeyGen,
            b"d",
            VoteType::SuccessObservation,
        ),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn disabled_flows_reject_observations() {
    let observers = accounts(1, 3);
    let mut state = seeded(&observers, "0.66");
    let admin = account(99);
    let policies = admin_policies(admin);

    update_crosschain_flags(
        &mut state,
        &policies,
        &TxContext::new(3, admin),
        CrosschainFlags {
            is_inbound_enabled: false,
            is_outbound_enabled: true,
        },
    )
    .unwrap();
    let ctx = TxContext::new(4, observers[0]);
    assert_err_kind!(
        vote_on_observation(&mut state, &ctx, ETH, ObservationType::InBoundTx, b"d", VoteType::SuccessObservation),
        ErrorKind::InvalidRequest
    );
    assert_ok!(vote_on_observation(
        &mut state,
        &ctx,
        ETH,
        ObservationType::OutBoundTx,
        b"d",
        VoteType::SuccessObservation
    ));

    // Absent flags count as disabled.
    state.delete(xchain_types::keys::CROSSCHAIN_FLAGS_KEY).unwrap();
    assert_err_kind!(
        vote_on_observation(&mut state, &ctx, ETH, ObservationType::OutBoundTx, b"e", VoteType::SuccessObservation),
        ErrorKind::InvalidRequest
    );
}

#[test]
fn flag_updates_require_group1() {
    let mut state = InMemoryState::new();
    let mut policies = StaticPolicyOracle::default();
    policies.grant(account(2), PolicyType::Group2);
    let flags = CrosschainFlags {
        is_inbound_enabled: false,
        is_outbound_enabled: false,
    };

    assert_err_kind!(
        update_crosschain_flags(&mut state, &policies, &TxContext::new(1, account(2)), flags),
        ErrorKind::Unauthorized
    );
    assert!(get_crosschain_flags(&state).unwrap().is_none());

    policies.grant(account(2), PolicyType::Group1);
    assert_ok!(update_crosschain_flags(
        &mut state,
        &policies,
        &TxContext::new(1, account(2)),
        flags
    ));
    assert_eq!(get_crosschain_flags(&state).unwrap(), Some(flags));
}

#[test]
fn random_lists_replace_exactly_the_old_entries() {
    let mut rng = TestRng::new(7);
    for _ in 0..50 {
        let pool = rng.account_ids(6);
        let len = rng.gen_range(1, 40) as usize;
        let mut list: Vec<AccountId> = (0..len)
            .map(|_| pool[rng.gen_range(0, pool.len() as u64) as usize])
            .collect();
        let old = list[rng.gen_range(0, len as u64) as usize];
        let new = rng.account_id();
        let original = list.clone();

        let replaced = update_observer_list(&mut list, &old, &new);
        assert_eq!(replaced, original.iter().filter(|a| **a == old).count());
        assert_eq!(list.len(), original.len());
        for (before, after) in original.iter().zip(&list) {
            if *before == old {
                assert_eq!(*after, new);
            } else {
                assert_eq!(after, before);
            }
        }
    }
}
