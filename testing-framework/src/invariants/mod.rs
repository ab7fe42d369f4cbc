//! Ledger invariant checkers
//!
//! Checks run over the raw storage of a [`MockHost`], independently of the
//! ledger code, so that they also catch states the ledger would refuse to
//! read back:
//! - Supply conservation: the sum of all balances equals the total supply
//! - Owner presence: no balance, supply or pause record exists without an
//!   owner record (allowances may predate initialization)
//! - Record shape: every key decodes and every value has its fixed size

use std::collections::BTreeMap;

use qash_common::{
    config::{AMOUNT_SIZE, PAUSE_FLAG_SIZE},
    crypto::{Address, ADDRESS_SIZE},
    keys::{decode, DecodedKey, RecordKind},
    policy::StorageLayout,
};
use thiserror::Error;

use crate::utilities::MockHost;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Sum of balances {sum} differs from total supply {total_supply}")]
    SupplyMismatch { sum: u128, total_supply: u64 },

    #[error("{records} balance, supply or pause record(s) stored without an owner record")]
    RecordsWithoutOwner { records: usize },

    #[error("Malformed {kind} record under key {key}: {size} bytes")]
    MalformedRecord {
        kind: RecordKind,
        key: String,
        size: usize,
    },

    #[error("Unknown storage key {0}")]
    UnknownKey(String),
}

fn expected_size(kind: RecordKind) -> usize {
    match kind {
        RecordKind::Owner => ADDRESS_SIZE,
        RecordKind::Paused => PAUSE_FLAG_SIZE,
        RecordKind::TotalSupply | RecordKind::Balance | RecordKind::Allowance => AMOUNT_SIZE,
    }
}

fn decode_amount(value: &[u8]) -> Option<u64> {
    let bytes: [u8; AMOUNT_SIZE] = value.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Every stored record, decoded, or the first key or value that is not a
/// well-formed ledger record
fn records(
    host: &MockHost,
    layout: StorageLayout,
) -> Result<Vec<(DecodedKey, &[u8])>, InvariantViolation> {
    host.entries()
        .map(|(key, value)| {
            let decoded =
                decode(key, layout).ok_or_else(|| InvariantViolation::UnknownKey(hex::encode(key)))?;
            if value.len() != expected_size(decoded.kind()) {
                return Err(InvariantViolation::MalformedRecord {
                    kind: decoded.kind(),
                    key: hex::encode(key),
                    size: value.len(),
                });
            }
            Ok((decoded, value))
        })
        .collect()
}

/// Stored balances, as written (without any read-width policy applied)
pub fn balances(
    host: &MockHost,
    layout: StorageLayout,
) -> Result<BTreeMap<Address, u64>, InvariantViolation> {
    let mut balances = BTreeMap::new();
    for (key, value) in records(host, layout)? {
        if let DecodedKey::Balance(address) = key {
            if let Some(amount) = decode_amount(value) {
                balances.insert(address, amount);
            }
        }
    }
    Ok(balances)
}

fn stored_total_supply(host: &MockHost, layout: StorageLayout) -> Result<u64, InvariantViolation> {
    let supply = records(host, layout)?
        .into_iter()
        .find(|(key, _)| *key == DecodedKey::TotalSupply)
        .and_then(|(_, value)| decode_amount(value))
        .unwrap_or(0);
    Ok(supply)
}

pub fn check_supply_conservation(
    host: &MockHost,
    layout: StorageLayout,
) -> Result<(), InvariantViolation> {
    let sum: u128 = balances(host, layout)?
        .values()
        .map(|amount| u128::from(*amount))
        .sum();
    let total_supply = stored_total_supply(host, layout)?;

    if sum != u128::from(total_supply) {
        return Err(InvariantViolation::SupplyMismatch { sum, total_supply });
    }
    Ok(())
}

pub fn check_owner_presence(
    host: &MockHost,
    layout: StorageLayout,
) -> Result<(), InvariantViolation> {
    let records = records(host, layout)?;
    let has_owner = records.iter().any(|(key, _)| *key == DecodedKey::Owner);
    let gated = records
        .iter()
        .filter(|(key, _)| key.kind() != RecordKind::Allowance)
        .count();
    if !has_owner && gated != 0 {
        return Err(InvariantViolation::RecordsWithoutOwner { records: gated });
    }
    Ok(())
}

/// Run every checker, collecting all violations
pub fn check_all(host: &MockHost, layout: StorageLayout) -> Vec<InvariantViolation> {
    if let Err(e) = records(host, layout) {
        // Shape errors make the other checks meaningless
        return vec![e];
    }

    [
        check_supply_conservation(host, layout),
        check_owner_presence(host, layout),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qash_common::keys::StorageKey;

    fn host() -> MockHost {
        MockHost::new(Address::from_label("deployer").unwrap())
    }

    #[test]
    fn test_empty_storage_holds() {
        assert!(check_all(&host(), StorageLayout::Prefixed).is_empty());
    }

    #[test]
    fn test_supply_mismatch_detected() {
        let mut host = host();
        let alice = Address::from_label("alice").unwrap();
        let layout = StorageLayout::Prefixed;
        host.raw_set(&StorageKey::Owner.encode(layout), alice.as_bytes());
        host.raw_set(&StorageKey::TotalSupply.encode(layout), &100u64.to_le_bytes());
        host.raw_set(&StorageKey::Balance(&alice).encode(layout), &90u64.to_le_bytes());

        assert_eq!(
            check_all(&host, layout),
            vec![InvariantViolation::SupplyMismatch {
                sum: 90,
                total_supply: 100
            }]
        );
    }

    #[test]
    fn test_records_without_owner_detected() {
        let mut host = host();
        let layout = StorageLayout::Prefixed;
        host.raw_set(&StorageKey::TotalSupply.encode(layout), &0u64.to_le_bytes());

        assert_eq!(
            check_owner_presence(&host, layout),
            Err(InvariantViolation::RecordsWithoutOwner { records: 1 })
        );
    }

    #[test]
    fn test_allowance_without_owner_holds() {
        let mut host = host();
        let layout = StorageLayout::Prefixed;
        let alice = Address::from_label("alice").unwrap();
        let bob = Address::from_label("bob").unwrap();
        host.raw_set(
            &StorageKey::Allowance {
                owner: &alice,
                spender: &bob,
            }
            .encode(layout),
            &5u64.to_le_bytes(),
        );

        assert!(check_all(&host, layout).is_empty());
    }

    #[test]
    fn test_unknown_and_malformed_keys() {
        let mut host = host();
        host.raw_set(b"SOMETHING", &[1]);
        assert!(matches!(
            check_all(&host, StorageLayout::Prefixed).as_slice(),
            [InvariantViolation::UnknownKey(_)]
        ));

        let mut host = self::host();
        host.raw_set(&StorageKey::Paused.encode(StorageLayout::Prefixed), &[1, 0]);
        assert!(matches!(
            check_all(&host, StorageLayout::Prefixed).as_slice(),
            [InvariantViolation::MalformedRecord {
                kind: RecordKind::Paused,
                size: 2,
                ..
            }]
        ));
    }
}
