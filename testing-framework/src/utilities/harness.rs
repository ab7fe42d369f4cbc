// File: testing-framework/src/utilities/harness.rs
//
// Invocation harness
//
// Runs one ledger operation at a time against a MockHost, the way the host
// dispatches exported functions: set the caller, execute to completion,
// and optionally discard the invocation's writes when it fails.

use log::debug;
use qash_common::{
    crypto::Address, error::LedgerError, event::LedgerEvent, host::Environment,
    policy::LedgerConfig,
};
use qash_contract::Ledger;

use super::mock_host::MockHost;

pub struct LedgerHarness {
    host: MockHost,
    config: LedgerConfig,
    rollback: bool,
}

impl LedgerHarness {
    /// Harness over an empty host deployed by `creator`.
    ///
    /// Failed invocations keep their writes unless rollback is enabled.
    pub fn new(config: LedgerConfig, creator: Address) -> Self {
        Self {
            host: MockHost::new(creator),
            config,
            rollback: false,
        }
    }

    /// Discard storage writes and events of failed invocations
    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback = rollback;
        self
    }

    pub fn host(&self) -> &MockHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut MockHost {
        &mut self.host
    }

    /// Execute one invocation as `caller`
    pub fn invoke<T>(
        &mut self,
        caller: &Address,
        operation: impl FnOnce(&mut Ledger<'_, MockHost>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        self.host.set_caller(*caller);
        let snapshot = self.rollback.then(|| self.host.snapshot());

        let result = {
            let mut ledger = Ledger::new(&mut self.host, self.config);
            operation(&mut ledger)
        };

        if let (Err(e), Some(snapshot)) = (&result, snapshot) {
            debug!("Rolling back failed invocation: {}", e);
            self.host.restore(snapshot);
        }
        result
    }

    pub fn balance(&mut self, address: &Address) -> Result<u64, LedgerError> {
        let creator = self.host.creator();
        self.invoke(&creator, |ledger| ledger.get_balance(address))
    }

    pub fn allowance(&mut self, owner: &Address, spender: &Address) -> Result<u64, LedgerError> {
        let creator = self.host.creator();
        self.invoke(&creator, |ledger| ledger.get_allowance(owner, spender))
    }

    pub fn total_supply(&mut self) -> Result<u64, LedgerError> {
        let creator = self.host.creator();
        self.invoke(&creator, |ledger| ledger.get_total_supply())
    }

    pub fn owner(&mut self) -> Result<Address, LedgerError> {
        let creator = self.host.creator();
        self.invoke(&creator, |ledger| ledger.get_owner())
    }

    pub fn is_paused(&mut self) -> Result<bool, LedgerError> {
        let creator = self.host.creator();
        self.invoke(&creator, |ledger| ledger.is_paused())
    }

    pub fn events(&self) -> &[LedgerEvent] {
        self.host.events()
    }
}
