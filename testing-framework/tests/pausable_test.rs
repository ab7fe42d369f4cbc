// File: testing-framework/tests/pausable_test.rs
//
// Pausable tests
//
// - Pause/unpause by the owner
// - Transfers blocked while paused
// - Toggling into the current state is an error
// - Owner-only and unrestricted pause policies

use qash_testing_framework::prelude::*;

fn setup(config: LedgerConfig) -> (LedgerHarness, Address, Address) {
    let owner = account("owner");
    let user = account("user");
    let mut harness = LedgerHarness::new(config, owner);
    harness
        .invoke(&owner, |ledger| ledger.initialize(1_000))
        .unwrap();
    harness
        .invoke(&owner, |ledger| ledger.transfer(&user, 100, 0))
        .unwrap();
    harness.host_mut().take_events();
    (harness, owner, user)
}

// ============================================================================
// TEST 1: Pause gate
// ============================================================================

#[test]
fn test_pause_blocks_transfers() {
    let (mut harness, owner, user) = setup(LedgerConfig::qash());

    harness.invoke(&owner, |ledger| ledger.pause()).unwrap();
    assert!(harness.is_paused().unwrap());
    assert_eq!(harness.events(), &[LedgerEvent::Pause]);

    let result = harness.invoke(&user, |ledger| ledger.transfer(&owner, 1, 0));
    assert_eq!(result, Err(LedgerError::Paused));

    // The owner is not exempt
    let result = harness.invoke(&owner, |ledger| ledger.transfer(&user, 1, 0));
    assert_eq!(result, Err(LedgerError::Paused));

    harness.invoke(&owner, |ledger| ledger.approve(&user, 5)).unwrap();
    let result = harness.invoke(&user, |ledger| ledger.transfer_from(&owner, &user, 5, 0));
    assert_eq!(result, Err(LedgerError::Paused));

    assert_eq!(harness.balance(&user).unwrap(), 100);
    assert_eq!(harness.balance(&owner).unwrap(), 900);
}

#[test]
fn test_unpause_restores_transfers() {
    let (mut harness, owner, user) = setup(LedgerConfig::qash());

    harness.invoke(&owner, |ledger| ledger.pause()).unwrap();
    harness.invoke(&owner, |ledger| ledger.unpause()).unwrap();
    assert!(!harness.is_paused().unwrap());

    harness
        .invoke(&user, |ledger| ledger.transfer(&owner, 100, 0))
        .unwrap();
    assert_eq!(harness.balance(&owner).unwrap(), 1_000);
    assert_eq!(harness.events()[..2], [LedgerEvent::Pause, LedgerEvent::Unpause]);
}

#[test]
fn test_toggle_into_current_state_rejected() {
    let (mut harness, owner, _) = setup(LedgerConfig::qash());

    assert_eq!(
        harness.invoke(&owner, |ledger| ledger.unpause()),
        Err(LedgerError::AlreadyInTargetState { paused: false })
    );

    harness.invoke(&owner, |ledger| ledger.pause()).unwrap();
    let err = harness
        .invoke(&owner, |ledger| ledger.pause())
        .unwrap_err();
    assert_eq!(err, LedgerError::AlreadyInTargetState { paused: true });
    assert_eq!(err.to_string(), "Ledger is already paused");

    assert!(harness.is_paused().unwrap());
    assert_eq!(harness.events(), &[LedgerEvent::Pause]);
}

// ============================================================================
// TEST 2: Access control
// ============================================================================

#[test]
fn test_non_owner_cannot_toggle() {
    let (mut harness, owner, user) = setup(LedgerConfig::qash());

    assert_eq!(
        harness.invoke(&user, |ledger| ledger.pause()),
        Err(LedgerError::Unauthorized)
    );

    harness.invoke(&owner, |ledger| ledger.pause()).unwrap();
    assert_eq!(
        harness.invoke(&user, |ledger| ledger.unpause()),
        Err(LedgerError::Unauthorized)
    );
    assert!(harness.is_paused().unwrap());
}

#[test]
fn test_unrestricted_policy_lets_anyone_toggle() {
    let config = LedgerConfig {
        pause_policy: PausePolicy::Unrestricted,
        ..LedgerConfig::qash()
    };
    let (mut harness, _, user) = setup(config);

    harness.invoke(&user, |ledger| ledger.pause()).unwrap();
    assert!(harness.is_paused().unwrap());
    assert_eq!(
        harness.invoke(&user, |ledger| ledger.pause()),
        Err(LedgerError::AlreadyInTargetState { paused: true })
    );
    harness.invoke(&user, |ledger| ledger.unpause()).unwrap();
    assert!(!harness.is_paused().unwrap());
}

#[test]
fn test_unrestricted_policy_still_requires_initialization() {
    let config = LedgerConfig {
        pause_policy: PausePolicy::Unrestricted,
        ..LedgerConfig::qash()
    };
    let user = account("user");
    let mut harness = LedgerHarness::new(config, account("owner"));

    assert_eq!(
        harness.invoke(&user, |ledger| ledger.pause()),
        Err(LedgerError::NotInitialized)
    );
}

#[test]
fn test_owner_queries_work_while_paused() {
    let (mut harness, owner, user) = setup(LedgerConfig::qash());
    harness.invoke(&owner, |ledger| ledger.pause()).unwrap();

    harness
        .invoke(&owner, |ledger| ledger.change_owner(&user))
        .unwrap();
    assert_eq!(harness.owner().unwrap(), user);
    assert_eq!(harness.balance(&owner).unwrap(), 900);
    assert_eq!(harness.total_supply().unwrap(), 1_000);
}
