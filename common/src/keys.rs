//! Storage key codec.
//!
//! Keys are built as `prefix || address bytes`, the prefix being the ASCII
//! record name followed by its NUL terminator. For allowances the owner
//! always precedes the spender.
//!
//! ```text
//! OWNER\0                          -> owner address      (35 bytes)
//! PAUSE\0                          -> pause flag         (1 byte)
//! TOTAL_SUPPLY\0                   -> total supply       (u64 LE)
//! BALANCES\0 | address             -> balance            (u64 LE)
//! ALLOWANCES\0 | owner | spender   -> allowance          (u64 LE)
//! ```
//!
//! The legacy layout stores balances under the raw address and the pause
//! flag under `IS_PAUSE\0`.

use crate::{
    config::{
        ALLOWANCES_PREFIX, ALLOWANCE_KEY_SIZE, BALANCES_PREFIX, BALANCE_KEY_SIZE,
        LEGACY_BALANCE_KEY_SIZE, LEGACY_PAUSE_KEY, OWNER_KEY, PAUSE_KEY, TOTAL_SUPPLY_KEY,
    },
    crypto::{Address, ADDRESS_SIZE},
    policy::StorageLayout,
};
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    Owner,
    Paused,
    TotalSupply,
    Balance,
    Allowance,
}

/// A record of the ledger, identified by its kind and address(es)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey<'a> {
    Owner,
    Paused,
    TotalSupply,
    Balance(&'a Address),
    Allowance {
        owner: &'a Address,
        spender: &'a Address,
    },
}

impl<'a> StorageKey<'a> {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Owner => RecordKind::Owner,
            Self::Paused => RecordKind::Paused,
            Self::TotalSupply => RecordKind::TotalSupply,
            Self::Balance(_) => RecordKind::Balance,
            Self::Allowance { .. } => RecordKind::Allowance,
        }
    }

    pub fn encode(&self, layout: StorageLayout) -> Vec<u8> {
        match (self, layout) {
            (Self::Owner, _) => OWNER_KEY.to_vec(),
            (Self::Paused, StorageLayout::Prefixed) => PAUSE_KEY.to_vec(),
            (Self::Paused, StorageLayout::Legacy) => LEGACY_PAUSE_KEY.to_vec(),
            (Self::TotalSupply, _) => TOTAL_SUPPLY_KEY.to_vec(),
            (Self::Balance(address), StorageLayout::Prefixed) => {
                let mut key = Vec::with_capacity(BALANCE_KEY_SIZE);
                key.extend_from_slice(BALANCES_PREFIX);
                key.extend_from_slice(address.as_bytes());
                key
            }
            (Self::Balance(address), StorageLayout::Legacy) => address.as_bytes().to_vec(),
            (Self::Allowance { owner, spender }, _) => {
                let mut key = Vec::with_capacity(ALLOWANCE_KEY_SIZE);
                key.extend_from_slice(ALLOWANCES_PREFIX);
                key.extend_from_slice(owner.as_bytes());
                key.extend_from_slice(spender.as_bytes());
                key
            }
        }
    }
}

/// Owned form of a [`StorageKey`], produced by [`decode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedKey {
    Owner,
    Paused,
    TotalSupply,
    Balance(Address),
    Allowance { owner: Address, spender: Address },
}

impl DecodedKey {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Owner => RecordKind::Owner,
            Self::Paused => RecordKind::Paused,
            Self::TotalSupply => RecordKind::TotalSupply,
            Self::Balance(_) => RecordKind::Balance,
            Self::Allowance { .. } => RecordKind::Allowance,
        }
    }
}

/// Inverse of [`StorageKey::encode`]. Returns `None` for bytes that no
/// record of the given layout is stored under.
pub fn decode(key: &[u8], layout: StorageLayout) -> Option<DecodedKey> {
    let pause_key = match layout {
        StorageLayout::Prefixed => PAUSE_KEY,
        StorageLayout::Legacy => LEGACY_PAUSE_KEY,
    };

    if key == OWNER_KEY {
        return Some(DecodedKey::Owner);
    }
    if key == pause_key {
        return Some(DecodedKey::Paused);
    }
    if key == TOTAL_SUPPLY_KEY {
        return Some(DecodedKey::TotalSupply);
    }

    if key.len() == ALLOWANCE_KEY_SIZE {
        if let Some(rest) = key.strip_prefix(ALLOWANCES_PREFIX) {
            let (owner, spender) = rest.split_at(ADDRESS_SIZE);
            return Some(DecodedKey::Allowance {
                owner: Address::from_slice(owner).ok()?,
                spender: Address::from_slice(spender).ok()?,
            });
        }
    }

    match layout {
        StorageLayout::Prefixed if key.len() == BALANCE_KEY_SIZE => key
            .strip_prefix(BALANCES_PREFIX)
            .and_then(|rest| Address::from_slice(rest).ok())
            .map(DecodedKey::Balance),
        StorageLayout::Legacy if key.len() == LEGACY_BALANCE_KEY_SIZE => {
            Address::from_slice(key).ok().map(DecodedKey::Balance)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn addresses() -> (Address, Address) {
        (
            Address::from_label("alice").unwrap(),
            Address::from_label("bob").unwrap(),
        )
    }

    #[test]
    fn test_prefixed_balance_key() {
        let (alice, _) = addresses();
        let key = StorageKey::Balance(&alice).encode(StorageLayout::Prefixed);
        assert_eq!(key.len(), BALANCE_KEY_SIZE);
        assert_eq!(&key[..9], b"BALANCES\0");
        assert_eq!(&key[9..], alice.as_bytes());
    }

    #[test]
    fn test_legacy_balance_key_is_raw_address() {
        let (alice, _) = addresses();
        let key = StorageKey::Balance(&alice).encode(StorageLayout::Legacy);
        assert_eq!(key, alice.as_bytes().to_vec());
        assert_eq!(
            StorageKey::Paused.encode(StorageLayout::Legacy),
            b"IS_PAUSE\0".to_vec()
        );
    }

    #[test]
    fn test_allowance_key_orders_owner_first() {
        let (alice, bob) = addresses();
        let forward = StorageKey::Allowance {
            owner: &alice,
            spender: &bob,
        }
        .encode(StorageLayout::Prefixed);
        let backward = StorageKey::Allowance {
            owner: &bob,
            spender: &alice,
        }
        .encode(StorageLayout::Prefixed);

        assert_eq!(forward.len(), ALLOWANCE_KEY_SIZE);
        assert_eq!(&forward[11..46], alice.as_bytes());
        assert_eq!(&forward[46..], bob.as_bytes());
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_keys_unique_across_kinds() {
        let (alice, bob) = addresses();
        for layout in [StorageLayout::Prefixed, StorageLayout::Legacy] {
            let keys = [
                StorageKey::Owner,
                StorageKey::Paused,
                StorageKey::TotalSupply,
                StorageKey::Balance(&alice),
                StorageKey::Balance(&bob),
                StorageKey::Allowance {
                    owner: &alice,
                    spender: &bob,
                },
                StorageKey::Allowance {
                    owner: &alice,
                    spender: &alice,
                },
            ];
            let encoded: HashSet<Vec<u8>> = keys.iter().map(|k| k.encode(layout)).collect();
            assert_eq!(encoded.len(), keys.len(), "collision in {layout} layout");
        }
    }

    #[test]
    fn test_balance_address_cannot_mimic_constant_key() {
        // An address starting with the owner key bytes still encodes to a
        // balance key that decodes back as a balance.
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[..OWNER_KEY.len()].copy_from_slice(OWNER_KEY);
        let tricky = Address::new(bytes);

        for layout in [StorageLayout::Prefixed, StorageLayout::Legacy] {
            let key = StorageKey::Balance(&tricky).encode(layout);
            assert_eq!(decode(&key, layout), Some(DecodedKey::Balance(tricky)));
        }
    }

    #[test]
    fn test_decode_inverts_encode() {
        let (alice, bob) = addresses();
        for layout in [StorageLayout::Prefixed, StorageLayout::Legacy] {
            let cases = [
                (StorageKey::Owner, DecodedKey::Owner),
                (StorageKey::Paused, DecodedKey::Paused),
                (StorageKey::TotalSupply, DecodedKey::TotalSupply),
                (StorageKey::Balance(&alice), DecodedKey::Balance(alice)),
                (
                    StorageKey::Allowance {
                        owner: &alice,
                        spender: &bob,
                    },
                    DecodedKey::Allowance {
                        owner: alice,
                        spender: bob,
                    },
                ),
            ];
            for (key, expected) in cases {
                assert_eq!(decode(&key.encode(layout), layout), Some(expected));
                assert_eq!(key.kind(), expected.kind());
            }
        }
    }

    #[test]
    fn test_decode_rejects_foreign_keys() {
        assert_eq!(decode(b"BALANCES\0", StorageLayout::Prefixed), None);
        assert_eq!(decode(b"IS_PAUSE\0", StorageLayout::Prefixed), None);
        assert_eq!(decode(b"PAUSE\0", StorageLayout::Legacy), None);
        let (alice, _) = addresses();
        assert_eq!(decode(alice.as_bytes(), StorageLayout::Prefixed), None);
    }
}
