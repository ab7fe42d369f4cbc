use log::{debug, info};
use qash_common::{
    config::{TOKEN_DECIMALS, TOKEN_SYMBOL},
    crypto::Address,
    error::LedgerError,
    event::LedgerEvent,
    host::Host,
    keys::StorageKey,
    math::{checked_add, checked_sub},
    policy::GenesisPolicy,
};

use super::Ledger;

/// New balances of a transfer, fully computed before anything is written
struct BalanceMove {
    from: Address,
    to: Address,
    from_balance: u64,
    to_balance: u64,
}

impl<H: Host + ?Sized> Ledger<'_, H> {
    /// Set up the owner and mint the whole supply to it.
    ///
    /// Callable exactly once per contract lifetime.
    pub fn initialize(&mut self, supply: u64) -> Result<(), LedgerError> {
        if self.is_initialized() {
            debug!("Ledger: already initialized");
            return Err(LedgerError::AlreadyInitialized);
        }

        let caller = self.host.caller();
        let owner = match self.config.genesis {
            GenesisPolicy::Caller => caller,
            GenesisPolicy::Creator => {
                let creator = self.host.creator();
                if caller != creator {
                    return Err(LedgerError::Unauthorized);
                }
                creator
            }
        };

        // The owner record marks the ledger as initialized, write it last
        // so that a rejected write leaves the ledger uninitialized.
        self.write_amount(StorageKey::Balance(&owner), supply)?;
        self.write_amount(StorageKey::TotalSupply, supply)?;
        self.write_owner(&owner)?;

        if log::log_enabled!(log::Level::Info) {
            info!("Ledger initialized: owner {} supply {}", owner, supply);
        }

        self.host.emit(LedgerEvent::Owner { owner });
        self.host.emit(LedgerEvent::Mint {
            to: owner,
            amount: supply,
        });
        Ok(())
    }

    pub fn get_owner(&self) -> Result<Address, LedgerError> {
        self.read_owner()?.ok_or(LedgerError::NotInitialized)
    }

    pub fn change_owner(&mut self, new_owner: &Address) -> Result<(), LedgerError> {
        self.require_initialized()?;
        let old_owner = self.require_owner()?;

        self.write_owner(new_owner)?;

        if log::log_enabled!(log::Level::Info) {
            info!("Ledger owner changed from {} to {}", old_owner, new_owner);
        }

        self.host.emit(LedgerEvent::ChangeOwner {
            old_owner,
            new_owner: *new_owner,
        });
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), LedgerError> {
        self.set_paused(true)
    }

    pub fn unpause(&mut self) -> Result<(), LedgerError> {
        self.set_paused(false)
    }

    // Toggling to the current state is an error, not a no-op
    fn set_paused(&mut self, paused: bool) -> Result<(), LedgerError> {
        self.require_initialized()?;
        self.require_pause_authority()?;
        if self.is_paused()? == paused {
            return Err(LedgerError::AlreadyInTargetState { paused });
        }

        self.write_paused_flag(paused)?;

        if paused {
            info!("Ledger paused");
            self.host.emit(LedgerEvent::Pause);
        } else {
            info!("Ledger unpaused");
            self.host.emit(LedgerEvent::Unpause);
        }
        Ok(())
    }

    /// Mint `amount` new tokens to the owner.
    ///
    /// Under creator genesis the creator's first mint on an ownerless ledger
    /// also makes it the owner, with no `initialize` call needed.
    pub fn mint(&mut self, amount: u64) -> Result<(), LedgerError> {
        if !self.config.mintable {
            return Err(LedgerError::MintingDisabled);
        }
        let (owner, genesis) = self.require_owner_or_genesis()?;
        self.require_not_paused()?;

        let total_supply = checked_add(self.read_total_supply()?, amount)?;
        let balance = checked_add(self.read_balance(&owner)?, amount)?;

        self.write_amount(StorageKey::Balance(&owner), balance)?;
        self.write_amount(StorageKey::TotalSupply, total_supply)?;
        if genesis {
            self.write_owner(&owner)?;
        }

        if log::log_enabled!(log::Level::Debug) {
            debug!("Minted {} to {}, total supply {}", amount, owner, total_supply);
        }

        if genesis {
            if log::log_enabled!(log::Level::Info) {
                info!("Ledger started by first mint: owner {}", owner);
            }
            self.host.emit(LedgerEvent::Owner { owner });
        }
        self.host.emit(LedgerEvent::Mint { to: owner, amount });
        Ok(())
    }

    pub fn get_balance(&self, address: &Address) -> Result<u64, LedgerError> {
        self.read_balance(address)
    }

    pub fn transfer(&mut self, to: &Address, amount: u64, memo: u64) -> Result<(), LedgerError> {
        self.require_initialized()?;
        self.require_not_paused()?;

        let from = self.host.caller();
        let balance_move = self.plan_move(&from, to, amount)?;
        self.apply_move(&balance_move)?;

        if log::log_enabled!(log::Level::Debug) {
            debug!("Transfer {} from {} to {} memo {}", amount, from, to, memo);
        }

        self.host.emit(LedgerEvent::Transfer {
            from,
            to: *to,
            amount,
            memo,
        });
        Ok(())
    }

    /// Set the allowance of `spender` over the caller's balance.
    ///
    /// Overwrites any previous allowance; approvals never accumulate. No
    /// guard applies, not even initialization.
    pub fn approve(&mut self, spender: &Address, amount: u64) -> Result<(), LedgerError> {
        let owner = self.host.caller();
        self.write_amount(
            StorageKey::Allowance {
                owner: &owner,
                spender,
            },
            amount,
        )?;

        if log::log_enabled!(log::Level::Debug) {
            debug!("Approval: {} allows {} to spend {}", owner, spender, amount);
        }

        self.host.emit(LedgerEvent::Approval {
            owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    /// Move `amount` out of `from` on behalf of the caller, consuming allowance
    pub fn transfer_from(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
        memo: u64,
    ) -> Result<(), LedgerError> {
        self.require_initialized()?;
        self.require_not_paused()?;

        let spender = self.host.caller();
        let allowance_key = StorageKey::Allowance {
            owner: from,
            spender: &spender,
        };

        let allowance = checked_sub(self.read_amount(allowance_key)?, amount)?;
        let balance_move = self.plan_move(from, to, amount)?;

        self.write_amount(allowance_key, allowance)?;
        self.apply_move(&balance_move)?;

        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "TransferFrom {} from {} to {} by {} memo {}, allowance left {}",
                amount, from, to, spender, memo, allowance
            );
        }

        self.host.emit(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount,
            memo,
        });
        Ok(())
    }

    pub fn get_allowance(&self, owner: &Address, spender: &Address) -> Result<u64, LedgerError> {
        self.read_amount(StorageKey::Allowance { owner, spender })
    }

    pub fn get_total_supply(&self) -> Result<u64, LedgerError> {
        self.read_total_supply()
    }

    pub fn get_decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    pub fn get_symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    // For a self transfer the credited balance is the already debited one,
    // so the net effect is zero and both writes carry the same value.
    fn plan_move(
        &self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<BalanceMove, LedgerError> {
        let from_balance = checked_sub(self.read_balance(from)?, amount)?;
        let to_base = if from == to {
            from_balance
        } else {
            self.read_balance(to)?
        };
        let to_balance = checked_add(to_base, amount)?;

        Ok(BalanceMove {
            from: *from,
            to: *to,
            from_balance,
            to_balance,
        })
    }

    fn apply_move(&mut self, balance_move: &BalanceMove) -> Result<(), LedgerError> {
        self.write_amount(
            StorageKey::Balance(&balance_move.from),
            balance_move.from_balance,
        )?;
        self.write_amount(
            StorageKey::Balance(&balance_move.to),
            balance_move.to_balance,
        )
    }
}
