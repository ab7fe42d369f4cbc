//! # QASH Testing Framework
//!
//! Deterministic, in-process testing for the QASH ledger.
//!
//! ## Architecture Overview
//!
//! - **utilities**: [`MockHost`](utilities::MockHost), an in-memory host
//!   with caller control, event capture and write-failure injection, and
//!   [`LedgerHarness`](utilities::LedgerHarness), which runs one invocation
//!   at a time with optional rollback of failed invocations
//! - **invariants**: supply conservation, owner presence and record shape,
//!   checked over raw storage
//! - **scenarios**: YAML DSL describing invocations and assertions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qash_testing_framework::prelude::*;
//!
//! let alice = account("alice");
//! let mut harness = LedgerHarness::new(LedgerConfig::qash(), alice);
//! harness.invoke(&alice, |ledger| ledger.initialize(1_000))?;
//! assert!(check_all(harness.host(), LedgerConfig::qash().layout).is_empty());
//! ```

#![warn(clippy::all)]

/// Supply and storage invariants
pub mod invariants;

/// YAML scenario parser and executor
pub mod scenarios;

/// Mock host and invocation harness
pub mod utilities;

pub mod prelude;
