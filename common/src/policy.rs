//! Ledger policy knobs.
//!
//! Earlier deployments of the token disagreed on a few behaviors (key
//! layout, balance width, who may pause, who owns the genesis supply).
//! Each of those is an explicit policy here instead of a separate
//! contract. [`LedgerConfig::qash`] is the reference configuration.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use thiserror::Error;

/// Storage key scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StorageLayout {
    // Every record kind has its own NUL terminated prefix
    Prefixed,
    // Balances keyed by the raw address, pause flag under IS_PAUSE
    Legacy,
}

/// Width used when decoding stored balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BalanceWidth {
    /// Full 64-bit balances.
    U64,
    /// Only the low 32 bits of a stored balance are honored.
    ///
    /// This reproduces the legacy read helper, which truncated every
    /// balance above `u32::MAX`. It is a bug, kept only so that state
    /// written by legacy deployments can be replayed bit for bit.
    TruncatedU32,
}

/// Who may toggle the pause flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PausePolicy {
    OwnerOnly,
    Unrestricted,
}

/// Who becomes owner (and receives the supply) on initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenesisPolicy {
    // Whoever calls initialize
    Caller,
    // The contract deployer; only the deployer may initialize
    Creator,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Truncated 32-bit balance reads are only supported with the legacy storage layout")]
    TruncatedReadsRequireLegacyLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    pub layout: StorageLayout,
    pub balance_width: BalanceWidth,
    pub pause_policy: PausePolicy,
    pub genesis: GenesisPolicy,
    // Allow the owner to mint after initialization
    pub mintable: bool,
}

impl LedgerConfig {
    /// Reference configuration: prefixed keys, 64-bit balances,
    /// owner-gated pause, fixed supply.
    pub const fn qash() -> Self {
        Self {
            layout: StorageLayout::Prefixed,
            balance_width: BalanceWidth::U64,
            pause_policy: PausePolicy::OwnerOnly,
            genesis: GenesisPolicy::Caller,
            mintable: false,
        }
    }

    /// Layout and ownership rules of the legacy mintable token.
    ///
    /// Balances are still decoded as 64-bit; switch `balance_width` to
    /// [`BalanceWidth::TruncatedU32`] explicitly to replay the legacy bug.
    pub const fn legacy_token() -> Self {
        Self {
            layout: StorageLayout::Legacy,
            balance_width: BalanceWidth::U64,
            pause_policy: PausePolicy::OwnerOnly,
            genesis: GenesisPolicy::Creator,
            mintable: true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.balance_width == BalanceWidth::TruncatedU32 && self.layout != StorageLayout::Legacy {
            return Err(ConfigError::TruncatedReadsRequireLegacyLayout);
        }

        if self.balance_width == BalanceWidth::TruncatedU32 && log::log_enabled!(log::Level::Warn) {
            log::warn!("Ledger configured with truncated 32-bit balance reads, balances above u32::MAX will be misreported");
        }

        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::qash()
    }
}
