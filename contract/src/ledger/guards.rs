use log::debug;
use qash_common::{
    crypto::Address,
    error::LedgerError,
    host::Host,
    keys::StorageKey,
    policy::{GenesisPolicy, PausePolicy},
};

use super::Ledger;

// Guards are predicates over current storage and the current caller.
// They are evaluated fresh on every call; nothing is cached.
impl<H: Host + ?Sized> Ledger<'_, H> {
    /// The owner record doubles as the initialization marker
    pub fn is_initialized(&self) -> bool {
        self.host.storage_size(&self.encode(StorageKey::Owner)) != 0
    }

    /// Whether the caller is the stored owner, false before initialization
    pub fn is_owner(&self) -> Result<bool, LedgerError> {
        let caller = self.host.caller();
        Ok(self.read_owner()?.is_some_and(|owner| owner == caller))
    }

    pub fn is_paused(&self) -> Result<bool, LedgerError> {
        self.read_paused_flag()
    }

    pub(super) fn require_initialized(&self) -> Result<(), LedgerError> {
        if !self.is_initialized() {
            debug!("Ledger: not initialized");
            return Err(LedgerError::NotInitialized);
        }
        Ok(())
    }

    /// Require the caller to be the owner, returning the owner
    pub(super) fn require_owner(&self) -> Result<Address, LedgerError> {
        let owner = self.read_owner()?.ok_or(LedgerError::NotInitialized)?;
        let caller = self.host.caller();
        if owner != caller {
            if log::log_enabled!(log::Level::Debug) {
                debug!("Ledger: unauthorized caller {}", caller);
            }
            return Err(LedgerError::Unauthorized);
        }
        Ok(owner)
    }

    /// Like [`Self::require_owner`], except that under creator genesis an
    /// ownerless ledger accepts the creator. The flag is true when the
    /// owner record still has to be written.
    pub(super) fn require_owner_or_genesis(&self) -> Result<(Address, bool), LedgerError> {
        if self.config.genesis == GenesisPolicy::Creator && self.read_owner()?.is_none() {
            let caller = self.host.caller();
            if caller != self.host.creator() {
                debug!("Ledger: only the creator may start an ownerless ledger");
                return Err(LedgerError::Unauthorized);
            }
            return Ok((caller, true));
        }
        self.require_owner().map(|owner| (owner, false))
    }

    pub(super) fn require_not_paused(&self) -> Result<(), LedgerError> {
        if self.is_paused()? {
            debug!("Ledger: paused");
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    pub(super) fn require_pause_authority(&self) -> Result<(), LedgerError> {
        match self.config.pause_policy {
            PausePolicy::OwnerOnly => self.require_owner().map(|_| ()),
            PausePolicy::Unrestricted => Ok(()),
        }
    }
}
