// File: testing-framework/src/utilities/mock_host.rs
//
// In-memory host for ledger tests
//
// Implements the storage, environment and event interfaces of the ledger on
// top of a BTreeMap, with a settable caller, a recorded event log and
// optional write-failure injection.

use std::collections::BTreeMap;

use qash_common::{
    crypto::Address,
    event::LedgerEvent,
    host::{Environment, EventSink, Storage},
};

/// Status returned by `storage_set` when a write is rejected
pub const WRITE_REJECTED_STATUS: i32 = -1;

/// Storage and event log captured at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSnapshot {
    storage: BTreeMap<Vec<u8>, Vec<u8>>,
    events: usize,
}

/// Mock host with ordered in-memory storage
#[derive(Debug, Clone)]
pub struct MockHost {
    /// In-memory storage: key → value
    storage: BTreeMap<Vec<u8>, Vec<u8>>,
    caller: Address,
    creator: Address,
    events: Vec<LedgerEvent>,
    /// Number of accepted writes
    writes: usize,
    /// Reject every write once this many writes have been accepted
    fail_writes_after: Option<usize>,
}

impl MockHost {
    /// Create an empty host deployed by `creator`, who is also the
    /// initial caller
    pub fn new(creator: Address) -> Self {
        Self {
            storage: BTreeMap::new(),
            caller: creator,
            creator,
            events: Vec::new(),
            writes: 0,
            fail_writes_after: None,
        }
    }

    pub fn set_caller(&mut self, caller: Address) {
        self.caller = caller;
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of writes accepted so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Reject writes once `count` more writes have been accepted
    pub fn fail_writes_after(&mut self, count: usize) {
        self.fail_writes_after = Some(self.writes + count);
    }

    pub fn clear_write_failure(&mut self) {
        self.fail_writes_after = None;
    }

    /// All stored entries in key order
    pub fn entries(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.storage
            .iter()
            .map(|(key, value)| (key.as_slice(), value.as_slice()))
    }

    /// Read a value without going through the ledger
    pub fn raw_get(&self, key: &[u8]) -> Option<&[u8]> {
        self.storage.get(key).map(Vec::as_slice)
    }

    /// Store a value without going through the ledger or the write counter,
    /// to seed or corrupt state
    pub fn raw_set(&mut self, key: &[u8], value: &[u8]) {
        self.storage.insert(key.to_vec(), value.to_vec());
    }

    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            storage: self.storage.clone(),
            events: self.events.len(),
        }
    }

    /// Restore storage and drop events recorded after `snapshot`
    pub fn restore(&mut self, snapshot: HostSnapshot) {
        self.storage = snapshot.storage;
        self.events.truncate(snapshot.events);
    }
}

impl Storage for MockHost {
    fn storage_size(&self, key: &[u8]) -> usize {
        self.storage.get(key).map_or(0, Vec::len)
    }

    fn storage_get(&self, key: &[u8], buffer: &mut [u8]) {
        if let Some(value) = self.storage.get(key) {
            let len = buffer.len().min(value.len());
            buffer[..len].copy_from_slice(&value[..len]);
        }
    }

    fn storage_set(&mut self, key: &[u8], value: &[u8]) -> i32 {
        if self
            .fail_writes_after
            .is_some_and(|limit| self.writes >= limit)
        {
            return WRITE_REJECTED_STATUS;
        }

        self.storage.insert(key.to_vec(), value.to_vec());
        self.writes += 1;
        0
    }
}

impl Environment for MockHost {
    fn caller(&self) -> Address {
        self.caller
    }

    fn creator(&self) -> Address {
        self.creator
    }
}

impl EventSink for MockHost {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> MockHost {
        MockHost::new(Address::from_label("deployer").unwrap())
    }

    #[test]
    fn test_load_absent_and_present() {
        let mut host = host();
        assert_eq!(host.storage_load(b"k"), None);
        assert_eq!(host.storage_set(b"k", &[1, 2, 3]), 0);
        assert_eq!(host.storage_size(b"k"), 3);
        assert_eq!(host.storage_load(b"k"), Some(vec![1, 2, 3]));
        assert_eq!(host.write_count(), 1);
    }

    #[test]
    fn test_write_failure_injection() {
        let mut host = host();
        host.fail_writes_after(1);
        assert_eq!(host.storage_set(b"a", &[1]), 0);
        assert_eq!(host.storage_set(b"b", &[1]), WRITE_REJECTED_STATUS);
        assert_eq!(host.raw_get(b"b"), None);

        host.clear_write_failure();
        assert_eq!(host.storage_set(b"b", &[1]), 0);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut host = host();
        host.raw_set(b"a", &[1]);
        let snapshot = host.snapshot();

        host.storage_set(b"a", &[2]);
        host.emit(LedgerEvent::Pause);
        host.restore(snapshot);

        assert_eq!(host.raw_get(b"a"), Some(&[1u8][..]));
        assert!(host.events().is_empty());
    }
}
