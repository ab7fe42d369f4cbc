//! The ledger: one invocation's view over the host.
//!
//! A [`Ledger`] borrows the host for exactly one exported operation and
//! keeps nothing in memory afterwards; every read goes through the storage
//! capability and every guard is re-evaluated.
//!
//! # Write discipline
//!
//! Operations that touch more than one record perform all guard checks and
//! all checked arithmetic before issuing the first write, and report their
//! events only after the last write succeeded. A failing operation
//! therefore emits nothing and, short of a host write failure, persists
//! nothing.

mod guards;
mod operations;
mod records;

use qash_common::{host::Host, keys::StorageKey, policy::LedgerConfig};

pub struct Ledger<'a, H: Host + ?Sized> {
    host: &'a mut H,
    config: LedgerConfig,
}

impl<'a, H: Host + ?Sized> Ledger<'a, H> {
    pub fn new(host: &'a mut H, config: LedgerConfig) -> Self {
        Self { host, config }
    }

    #[inline]
    fn encode(&self, key: StorageKey<'_>) -> Vec<u8> {
        key.encode(self.config.layout)
    }
}
