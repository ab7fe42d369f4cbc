//! YAML scenario execution engine
//!
//! Executes a parsed [`TestScenario`] step by step against a
//! [`LedgerHarness`], records the outcome of every invocation and checks
//! the ledger invariants once all steps ran.
//!
//! # Example
//!
//! ```rust,ignore
//! use qash_testing_framework::scenarios::{parse_scenario, ScenarioExecutor};
//!
//! let scenario = parse_scenario(yaml)?;
//! let report = ScenarioExecutor::new().execute(&scenario)?;
//!
//! assert!(report.passed());
//! ```

use std::collections::BTreeMap;

use log::{debug, info, warn};
use qash_common::{
    crypto::{Address, AddressError, ADDRESS_SIZE},
    error::LedgerError,
    event::LedgerEvent,
    policy::ConfigError,
};
use serde::Serialize;
use thiserror::Error;

use super::parser::{Action, Step, TestScenario};
use crate::{invariants, utilities::LedgerHarness};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Invalid account {name}: {source}")]
    InvalidAccount {
        name: String,
        #[source]
        source: AddressError,
    },

    #[error("Invalid ledger config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Error {
        name: String,
        code: u32,
        message: String,
    },
}

impl StepOutcome {
    fn from_result(result: Result<Option<String>, LedgerError>) -> Self {
        match result {
            Ok(value) => Self::Ok { value },
            Err(e) => Self::Error {
                name: e.name().to_string(),
                code: e.code(),
                message: e.to_string(),
            },
        }
    }

    fn error_name(&self) -> Option<&str> {
        match self {
            Self::Ok { .. } => None,
            Self::Error { name, .. } => Some(name),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// 1-indexed step number
    pub step: usize,
    pub action: &'static str,
    pub caller: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
    /// Events in emission order
    pub events: Vec<LedgerEvent>,
    /// Final stored balances, keyed by account name when known
    pub balances: BTreeMap<String, u64>,
    pub invariant_violations: Vec<String>,
    /// Unmet expectations and failed assertions
    pub failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.invariant_violations.is_empty()
    }
}

/// Account name → address resolution for one scenario
struct Accounts<'a> {
    named: &'a BTreeMap<String, Address>,
}

impl Accounts<'_> {
    fn resolve(&self, name: &str) -> Result<Address, ScenarioError> {
        if let Some(address) = self.named.get(name) {
            return Ok(*address);
        }

        let parsed = if name.len() == ADDRESS_SIZE * 2 {
            Address::from_hex(name)
        } else {
            Address::from_label(name)
        };
        parsed.map_err(|source| ScenarioError::InvalidAccount {
            name: name.to_string(),
            source,
        })
    }

    fn name_of(address: &Address, known: &BTreeMap<Address, String>) -> String {
        known
            .get(address)
            .cloned()
            .unwrap_or_else(|| address.to_hex())
    }
}

/// Scenario executor
#[derive(Debug, Default)]
pub struct ScenarioExecutor {
    rollback: bool,
}

impl ScenarioExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the writes of failed invocations
    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback = rollback;
        self
    }

    /// Execute a complete scenario
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or an account name does not
    /// resolve to an address. Failed steps and assertions are reported, not
    /// returned.
    pub fn execute(&self, scenario: &TestScenario) -> Result<ScenarioReport, ScenarioError> {
        scenario.config.validate()?;

        let accounts = Accounts {
            named: &scenario.accounts,
        };
        let creator = accounts.resolve(&scenario.creator)?;

        // Reverse lookup for the report
        let mut known = BTreeMap::new();
        known.insert(creator, scenario.creator.clone());
        for (name, address) in &scenario.accounts {
            known.insert(*address, name.clone());
        }

        let mut harness =
            LedgerHarness::new(scenario.config, creator).with_rollback(self.rollback);
        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut failures = Vec::new();

        info!("Running scenario '{}'", scenario.name);

        for (index, step) in scenario.steps.iter().enumerate() {
            let number = index + 1;
            let caller_name = step.caller.as_deref().unwrap_or(&scenario.creator);
            let caller = accounts.resolve(caller_name)?;
            known.entry(caller).or_insert_with(|| caller_name.to_string());
            for name in step.action.accounts() {
                let address = accounts.resolve(name)?;
                known.entry(address).or_insert_with(|| name.to_string());
            }

            let (outcome, assertion) = self.run_step(&mut harness, &accounts, &caller, step)?;

            if let Some(message) = assertion {
                failures.push(format!("step {} ({}): {}", number, step.action.name(), message));
            }
            if let Some(message) = check_expectation(step, &outcome) {
                failures.push(format!("step {} ({}): {}", number, step.action.name(), message));
            }

            if log::log_enabled!(log::Level::Debug) {
                debug!("Step {} {} by {}: {:?}", number, step.action.name(), caller_name, outcome);
            }

            steps.push(StepReport {
                step: number,
                action: step.action.name(),
                caller: caller_name.to_string(),
                outcome,
            });
        }

        let layout = scenario.config.layout;
        let invariant_violations: Vec<String> = invariants::check_all(harness.host(), layout)
            .iter()
            .map(ToString::to_string)
            .collect();
        for violation in &invariant_violations {
            warn!("Invariant violated: {}", violation);
        }

        let balances = invariants::balances(harness.host(), layout)
            .map(|balances| {
                balances
                    .iter()
                    .map(|(address, amount)| (Accounts::name_of(address, &known), *amount))
                    .collect()
            })
            .unwrap_or_default();

        let report = ScenarioReport {
            name: scenario.name.clone(),
            steps,
            events: harness.events().to_vec(),
            balances,
            invariant_violations,
            failures,
        };

        if report.passed() {
            info!("Scenario '{}' passed", scenario.name);
        } else {
            warn!(
                "Scenario '{}' failed: {} failure(s), {} invariant violation(s)",
                scenario.name,
                report.failures.len(),
                report.invariant_violations.len()
            );
        }
        Ok(report)
    }

    /// Run one step, returning its outcome and a failed assertion, if any
    fn run_step(
        &self,
        harness: &mut LedgerHarness,
        accounts: &Accounts<'_>,
        caller: &Address,
        step: &Step,
    ) -> Result<(StepOutcome, Option<String>), ScenarioError> {
        let result: Result<Option<String>, LedgerError> = match &step.action {
            Action::Initialize { supply } => harness
                .invoke(caller, |ledger| ledger.initialize(*supply))
                .map(|_| None),
            Action::ChangeOwner { new_owner } => {
                let new_owner = accounts.resolve(new_owner)?;
                harness
                    .invoke(caller, |ledger| ledger.change_owner(&new_owner))
                    .map(|_| None)
            }
            Action::Pause => harness.invoke(caller, |ledger| ledger.pause()).map(|_| None),
            Action::Unpause => harness.invoke(caller, |ledger| ledger.unpause()).map(|_| None),
            Action::Mint { amount } => harness
                .invoke(caller, |ledger| ledger.mint(*amount))
                .map(|_| None),
            Action::Transfer { to, amount, memo } => {
                let to = accounts.resolve(to)?;
                harness
                    .invoke(caller, |ledger| ledger.transfer(&to, *amount, *memo))
                    .map(|_| None)
            }
            Action::Approve { spender, amount } => {
                let spender = accounts.resolve(spender)?;
                harness
                    .invoke(caller, |ledger| ledger.approve(&spender, *amount))
                    .map(|_| None)
            }
            Action::TransferFrom {
                from,
                to,
                amount,
                memo,
            } => {
                let (from, to) = (accounts.resolve(from)?, accounts.resolve(to)?);
                harness
                    .invoke(caller, |ledger| {
                        ledger.transfer_from(&from, &to, *amount, *memo)
                    })
                    .map(|_| None)
            }
            Action::GetOwner => harness
                .invoke(caller, |ledger| ledger.get_owner())
                .map(|owner| Some(owner.to_hex())),
            Action::IsOwner => harness
                .invoke(caller, |ledger| ledger.is_owner())
                .map(|is_owner| Some(is_owner.to_string())),
            Action::GetBalance { account } => {
                let account = accounts.resolve(account)?;
                harness
                    .invoke(caller, |ledger| ledger.get_balance(&account))
                    .map(|balance| Some(balance.to_string()))
            }
            Action::GetAllowance { owner, spender } => {
                let (owner, spender) = (accounts.resolve(owner)?, accounts.resolve(spender)?);
                harness
                    .invoke(caller, |ledger| ledger.get_allowance(&owner, &spender))
                    .map(|allowance| Some(allowance.to_string()))
            }
            Action::GetTotalSupply => harness
                .invoke(caller, |ledger| ledger.get_total_supply())
                .map(|supply| Some(supply.to_string())),
            Action::GetDecimals => harness
                .invoke(caller, |ledger| Ok(ledger.get_decimals()))
                .map(|decimals| Some(decimals.to_string())),
            Action::GetSymbol => harness
                .invoke(caller, |ledger| Ok(ledger.get_symbol()))
                .map(|symbol| Some(symbol.to_string())),

            Action::AssertBalance { account, eq } => {
                let address = accounts.resolve(account)?;
                let result = harness.balance(&address);
                return Ok(assert_value(result, *eq, |actual| {
                    format!("balance of {} is {}, expected {}", account, actual, eq)
                }));
            }
            Action::AssertAllowance { owner, spender, eq } => {
                let (owner_address, spender_address) = (accounts.resolve(owner)?, accounts.resolve(spender)?);
                let result = harness.allowance(&owner_address, &spender_address);
                return Ok(assert_value(result, *eq, |actual| {
                    format!(
                        "allowance of {} over {} is {}, expected {}",
                        spender, owner, actual, eq
                    )
                }));
            }
            Action::AssertTotalSupply { eq } => {
                let result = harness.total_supply();
                return Ok(assert_value(result, *eq, |actual| {
                    format!("total supply is {}, expected {}", actual, eq)
                }));
            }
            Action::AssertOwner { account } => {
                let expected = accounts.resolve(account)?;
                let result = harness.owner();
                return Ok(assert_value(result, expected, |actual| {
                    format!("owner is {}, expected {}", actual, account)
                }));
            }
            Action::AssertPaused { eq } => {
                let result = harness.is_paused();
                return Ok(assert_value(result, *eq, |actual| {
                    format!("paused is {}, expected {}", actual, eq)
                }));
            }
        };

        Ok((StepOutcome::from_result(result), None))
    }
}

fn assert_value<T: PartialEq + ToString>(
    result: Result<T, LedgerError>,
    expected: T,
    mismatch: impl FnOnce(&T) -> String,
) -> (StepOutcome, Option<String>) {
    match result {
        Ok(actual) => {
            let failure = (actual != expected).then(|| mismatch(&actual));
            (
                StepOutcome::Ok {
                    value: Some(actual.to_string()),
                },
                failure,
            )
        }
        // Reported through the step's error expectation
        Err(e) => (StepOutcome::from_result(Err(e)), None),
    }
}

/// Compare the outcome with the step's `expect_error`
fn check_expectation(step: &Step, outcome: &StepOutcome) -> Option<String> {
    match (step.expect_error.as_deref(), outcome.error_name()) {
        (None, None) => None,
        (Some(expected), Some(actual)) if expected == actual => None,
        (Some(expected), Some(actual)) => {
            Some(format!("expected error {}, got {}", expected, actual))
        }
        (Some(expected), None) => Some(format!("expected error {}, got success", expected)),
        (None, Some(actual)) => Some(format!("unexpected error {}", actual)),
    }
}
