//! YAML scenario parser and executor
//!
//! A scenario is a sequence of ledger invocations, each made by a named
//! caller, interleaved with assertions on the resulting state. After the
//! last step the ledger invariants are checked.
//!
//! ## Example Scenario
//!
//! ```yaml
//! name: "Delegated transfer"
//! creator: "alice"
//! steps:
//!   - action: "initialize"
//!     supply: 1000
//!   - action: "approve"
//!     spender: "bob"
//!     amount: 100
//!   - action: "transfer_from"
//!     caller: "bob"
//!     from: "alice"
//!     to: "carol"
//!     amount: 60
//!   - action: "transfer_from"
//!     caller: "bob"
//!     from: "alice"
//!     to: "carol"
//!     amount: 50
//!     expect_error: "ArithmeticUnderflow"
//!   - action: "assert_balance"
//!     account: "carol"
//!     eq: 60
//! ```
//!
//! Accounts are resolved through the `accounts` table first, then as a hex
//! address, then as a label padded to an address.

pub mod executor;
pub mod parser;

pub use executor::{ScenarioError, ScenarioExecutor, ScenarioReport, StepOutcome, StepReport};
pub use parser::{parse_scenario, Action, Step, TestScenario};
