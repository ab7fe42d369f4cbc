//! Commonly used types for ledger tests

pub use crate::{
    invariants::{check_all, check_owner_presence, check_supply_conservation, InvariantViolation},
    scenarios::{parse_scenario, ScenarioExecutor, ScenarioReport},
    utilities::{account, LedgerHarness, MockHost},
};

pub use qash_common::{
    crypto::Address,
    error::{LedgerError, StorageError},
    event::LedgerEvent,
    keys::{RecordKind, StorageKey},
    policy::{BalanceWidth, GenesisPolicy, LedgerConfig, PausePolicy, StorageLayout},
};
