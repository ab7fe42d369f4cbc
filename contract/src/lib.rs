//! QASH fungible token ledger.
//!
//! A deterministic ERC20-style ledger executed as guest code inside a
//! host-controlled sandbox:
//!
//! - Ledger: balances and a fixed total supply minted at initialization
//! - Ownable: a single owner who may hand over ownership
//! - Pausable: an owner-controlled switch that blocks transfers
//! - Allowances: delegated transfers through `approve` / `transfer_from`
//!
//! # Exported operations
//!
//! | Operation | Guards | Event |
//! |---|---|---|
//! | `initialize(supply)` | not initialized | `Owner`, `Mint` |
//! | `get_owner()` | initialized | |
//! | `is_owner()` | | |
//! | `change_owner(new_owner)` | owner | `ChangeOwner` |
//! | `get_balance(address)` | | |
//! | `pause()` / `unpause()` | owner, state differs | `Pause` / `Unpause` |
//! | `mint(amount)` | mintable, owner (or creator on an ownerless creator-genesis ledger), not paused | `Owner` on first mint, `Mint` |
//! | `transfer(to, amount, memo)` | not paused | `Transfer` |
//! | `approve(spender, amount)` | | `Approval` |
//! | `transfer_from(from, to, amount, memo)` | not paused, allowance | `Transfer` |
//! | `get_allowance(owner, spender)` | | |
//! | `get_total_supply()`, `get_decimals()`, `get_symbol()` | | |
//!
//! The behavior of earlier deployments (raw-address balance keys, ungated
//! pause, creator-owned genesis, minting) is selected through
//! [`LedgerConfig`].
//!
//! ```
//! # use qash_contract::Ledger;
//! # use qash_common::policy::LedgerConfig;
//! # fn run<H: qash_common::host::Host>(host: &mut H) -> Result<(), qash_common::error::LedgerError> {
//! let mut ledger = Ledger::new(host, LedgerConfig::qash());
//! ledger.initialize(1_000)?;
//! # Ok(())
//! # }
//! ```

mod ledger;

#[cfg(all(target_arch = "wasm32", target_os = "wasi"))]
pub mod entrypoints;

pub use ledger::Ledger;
pub use qash_common::{
    crypto::Address,
    error::{LedgerError, StorageError},
    event::LedgerEvent,
    policy::LedgerConfig,
};
