//! Shared building blocks of the QASH ledger: the address type, the storage
//! key codec, checked arithmetic, errors, events, ledger policies and the
//! host interface the ledger is executed against.

pub mod config;
pub mod crypto;
pub mod error;
pub mod event;
pub mod host;
pub mod keys;
pub mod math;
pub mod policy;
