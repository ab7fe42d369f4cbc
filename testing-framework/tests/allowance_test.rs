// File: testing-framework/tests/allowance_test.rs
//
// Allowance tests
//
// - Delegated transfer walkthrough
// - Approve overwrites instead of accumulating
// - Allowance exhaustion leaves state unchanged
// - Owner-to-self and spender-to-self delegated transfers

use qash_testing_framework::prelude::*;

struct Parties {
    harness: LedgerHarness,
    a: Address,
    b: Address,
    c: Address,
}

fn setup() -> Parties {
    let a = account("A");
    let mut harness = LedgerHarness::new(LedgerConfig::qash(), a);
    harness.invoke(&a, |ledger| ledger.initialize(1_000)).unwrap();
    Parties {
        harness,
        a,
        b: account("B"),
        c: account("C"),
    }
}

#[test]
fn test_delegated_transfer_walkthrough() {
    let Parties {
        mut harness,
        a,
        b,
        c,
    } = setup();

    harness.invoke(&a, |ledger| ledger.approve(&b, 300)).unwrap();
    assert_eq!(harness.allowance(&a, &b).unwrap(), 300);

    harness
        .invoke(&b, |ledger| ledger.transfer_from(&a, &c, 200, 0))
        .unwrap();
    assert_eq!(harness.balance(&a).unwrap(), 800);
    assert_eq!(harness.balance(&c).unwrap(), 200);
    assert_eq!(harness.allowance(&a, &b).unwrap(), 100);

    let writes = harness.host().write_count();
    let events = harness.events().len();
    let result = harness.invoke(&b, |ledger| ledger.transfer_from(&a, &c, 150, 0));

    assert_eq!(result, Err(LedgerError::ArithmeticUnderflow));
    assert_eq!(harness.host().write_count(), writes);
    assert_eq!(harness.events().len(), events);
    assert_eq!(harness.balance(&a).unwrap(), 800);
    assert_eq!(harness.balance(&c).unwrap(), 200);
    assert_eq!(harness.allowance(&a, &b).unwrap(), 100);
    assert!(check_all(harness.host(), StorageLayout::Prefixed).is_empty());
}

#[test]
fn test_events_of_delegated_transfer() {
    let Parties {
        mut harness,
        a,
        b,
        c,
    } = setup();
    harness.host_mut().take_events();

    harness.invoke(&a, |ledger| ledger.approve(&b, 300)).unwrap();
    harness
        .invoke(&b, |ledger| ledger.transfer_from(&a, &c, 200, 9))
        .unwrap();

    // Transfer reports the debited account, not the spender
    assert_eq!(
        harness.events(),
        &[
            LedgerEvent::Approval {
                owner: a,
                spender: b,
                amount: 300
            },
            LedgerEvent::Transfer {
                from: a,
                to: c,
                amount: 200,
                memo: 9
            },
        ]
    );
}

#[test]
fn test_approve_overwrites() {
    let Parties {
        mut harness, a, b, ..
    } = setup();

    harness.invoke(&a, |ledger| ledger.approve(&b, 300)).unwrap();
    harness.invoke(&a, |ledger| ledger.approve(&b, 50)).unwrap();
    assert_eq!(harness.allowance(&a, &b).unwrap(), 50);

    harness.invoke(&a, |ledger| ledger.approve(&b, 0)).unwrap();
    assert_eq!(harness.allowance(&a, &b).unwrap(), 0);
}

#[test]
fn test_allowances_are_directional() {
    let Parties {
        mut harness, a, b, ..
    } = setup();

    harness.invoke(&a, |ledger| ledger.approve(&b, 300)).unwrap();
    assert_eq!(harness.allowance(&b, &a).unwrap(), 0);

    let result = harness.invoke(&a, |ledger| ledger.transfer_from(&b, &a, 1, 0));
    assert_eq!(result, Err(LedgerError::ArithmeticUnderflow));
}

#[test]
fn test_approve_above_balance_is_allowed() {
    let Parties {
        mut harness,
        a,
        b,
        c,
    } = setup();

    harness
        .invoke(&a, |ledger| ledger.approve(&b, u64::MAX))
        .unwrap();

    // The balance check fails, the allowance stays intact
    let result = harness.invoke(&b, |ledger| ledger.transfer_from(&a, &c, 1_001, 0));
    assert_eq!(result, Err(LedgerError::ArithmeticUnderflow));
    assert_eq!(harness.allowance(&a, &b).unwrap(), u64::MAX);
    assert_eq!(harness.balance(&a).unwrap(), 1_000);
}

#[test]
fn test_exact_allowance_is_consumed() {
    let Parties {
        mut harness,
        a,
        b,
        c,
    } = setup();

    harness.invoke(&a, |ledger| ledger.approve(&b, 400)).unwrap();
    harness
        .invoke(&b, |ledger| ledger.transfer_from(&a, &c, 400, 0))
        .unwrap();

    assert_eq!(harness.allowance(&a, &b).unwrap(), 0);
    let result = harness.invoke(&b, |ledger| ledger.transfer_from(&a, &c, 1, 0));
    assert_eq!(result, Err(LedgerError::ArithmeticUnderflow));
}

#[test]
fn test_delegated_self_transfer_consumes_allowance_only() {
    let Parties {
        mut harness, a, b, ..
    } = setup();

    harness.invoke(&a, |ledger| ledger.approve(&b, 300)).unwrap();
    harness
        .invoke(&b, |ledger| ledger.transfer_from(&a, &a, 200, 0))
        .unwrap();

    assert_eq!(harness.balance(&a).unwrap(), 1_000);
    assert_eq!(harness.allowance(&a, &b).unwrap(), 100);
    assert!(check_all(harness.host(), StorageLayout::Prefixed).is_empty());
}

#[test]
fn test_spender_may_pay_itself() {
    let Parties {
        mut harness, a, b, ..
    } = setup();

    harness.invoke(&a, |ledger| ledger.approve(&b, 300)).unwrap();
    harness
        .invoke(&b, |ledger| ledger.transfer_from(&a, &b, 300, 0))
        .unwrap();

    assert_eq!(harness.balance(&b).unwrap(), 300);
    assert_eq!(harness.balance(&a).unwrap(), 700);
}

#[test]
fn test_approve_while_paused() {
    let Parties {
        mut harness,
        a,
        b,
        c,
    } = setup();

    harness.invoke(&a, |ledger| ledger.pause()).unwrap();
    harness.invoke(&a, |ledger| ledger.approve(&b, 10)).unwrap();
    assert_eq!(harness.allowance(&a, &b).unwrap(), 10);

    let result = harness.invoke(&b, |ledger| ledger.transfer_from(&a, &c, 10, 0));
    assert_eq!(result, Err(LedgerError::Paused));
    assert_eq!(harness.allowance(&a, &b).unwrap(), 10, "Allowance untouched");
}
