//! Test utilities: an in-memory host and a per-invocation harness.

pub mod harness;
pub mod mock_host;

pub use harness::LedgerHarness;
pub use mock_host::{HostSnapshot, MockHost, WRITE_REJECTED_STATUS};

use qash_common::crypto::Address;

/// Deterministic address for a test account name.
///
/// # Panics
/// Panics if `name` is empty or longer than an address.
pub fn account(name: &str) -> Address {
    Address::from_label(name).unwrap_or_else(|e| panic!("invalid account name {:?}: {}", name, e))
}
