//! Host interface consumed by the ledger.
//!
//! The host owns durability, identity resolution and event delivery. The
//! ledger only sees these three narrow traits, so a test can drive it with
//! an in-memory fake and the guest build with the sandbox imports.
//!
//! ```text
//! exported operation
//!     ↓
//! Ledger (guards, arithmetic)
//!     ↓                 ↓                ↓
//! Storage          Environment       EventSink
//! (size/get/set)   (caller/creator)  (emit)
//! ```

use crate::{crypto::Address, error::StorageError, event::LedgerEvent, keys::RecordKind};

/// Key/value storage scoped to this contract instance
pub trait Storage {
    /// Size of the value stored under `key`, 0 when absent
    fn storage_size(&self, key: &[u8]) -> usize;

    /// Copy the value stored under `key` into `buffer`.
    ///
    /// `buffer` must be exactly `storage_size(key)` bytes long.
    fn storage_get(&self, key: &[u8], buffer: &mut [u8]);

    /// Store `value` under `key`, returning the host status (0 on success)
    fn storage_set(&mut self, key: &[u8], value: &[u8]) -> i32;

    /// Load the whole value stored under `key`, if any
    fn storage_load(&self, key: &[u8]) -> Option<Vec<u8>> {
        let size = self.storage_size(key);
        if size == 0 {
            return None;
        }

        let mut buffer = vec![0u8; size];
        self.storage_get(key, &mut buffer);
        Some(buffer)
    }

    /// Store `value` and turn a non-zero host status into an error
    fn storage_store(
        &mut self,
        kind: RecordKind,
        key: &[u8],
        value: &[u8],
    ) -> Result<(), StorageError> {
        match self.storage_set(key, value) {
            0 => Ok(()),
            status => Err(StorageError::WriteRejected { kind, status }),
        }
    }
}

/// Identity of the parties involved in the current invocation
pub trait Environment {
    fn caller(&self) -> Address;

    fn creator(&self) -> Address;
}

pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// Everything the ledger needs from its host
pub trait Host: Storage + Environment + EventSink {}

impl<T: Storage + Environment + EventSink + ?Sized> Host for T {}
