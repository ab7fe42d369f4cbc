use log::{trace, warn};
use qash_common::{
    config::{AMOUNT_SIZE, LEGACY_AMOUNT_READ_SIZE, PAUSE_FLAG_SIZE},
    crypto::{Address, ADDRESS_SIZE},
    error::{LedgerError, StorageError},
    host::Host,
    keys::{RecordKind, StorageKey},
    policy::BalanceWidth,
};

use super::Ledger;

// Typed access to the persisted records.
// Absent records read as their zero value; a record with an unexpected
// width is reported as corrupted rather than guessed at.
impl<H: Host + ?Sized> Ledger<'_, H> {
    pub(super) fn read_owner(&self) -> Result<Option<Address>, LedgerError> {
        let Some(bytes) = self.host.storage_load(&self.encode(StorageKey::Owner)) else {
            return Ok(None);
        };

        let owner = Address::from_slice(&bytes).map_err(|_| StorageError::UnexpectedValueSize {
            kind: RecordKind::Owner,
            expected: ADDRESS_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Some(owner))
    }

    pub(super) fn write_owner(&mut self, owner: &Address) -> Result<(), LedgerError> {
        let key = self.encode(StorageKey::Owner);
        self.host
            .storage_store(RecordKind::Owner, &key, owner.as_bytes())?;
        Ok(())
    }

    pub(super) fn read_paused_flag(&self) -> Result<bool, LedgerError> {
        let Some(bytes) = self.host.storage_load(&self.encode(StorageKey::Paused)) else {
            return Ok(false);
        };

        if bytes.len() != PAUSE_FLAG_SIZE {
            return Err(StorageError::UnexpectedValueSize {
                kind: RecordKind::Paused,
                expected: PAUSE_FLAG_SIZE,
                actual: bytes.len(),
            }
            .into());
        }
        Ok(bytes[0] != 0)
    }

    pub(super) fn write_paused_flag(&mut self, paused: bool) -> Result<(), LedgerError> {
        let key = self.encode(StorageKey::Paused);
        self.host
            .storage_store(RecordKind::Paused, &key, &[paused as u8])?;
        Ok(())
    }

    /// Read a u64 record, 0 when absent
    pub(super) fn read_amount(&self, key: StorageKey<'_>) -> Result<u64, LedgerError> {
        let Some(bytes) = self.host.storage_load(&self.encode(key)) else {
            return Ok(0);
        };

        let bytes: [u8; AMOUNT_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| StorageError::UnexpectedValueSize {
                    kind: key.kind(),
                    expected: AMOUNT_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub(super) fn write_amount(
        &mut self,
        key: StorageKey<'_>,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let encoded = self.encode(key);
        self.host
            .storage_store(key.kind(), &encoded, &amount.to_le_bytes())?;
        Ok(())
    }

    /// Read a balance, honoring the configured balance width
    pub(super) fn read_balance(&self, address: &Address) -> Result<u64, LedgerError> {
        let stored = self.read_amount(StorageKey::Balance(address))?;
        match self.config.balance_width {
            BalanceWidth::U64 => Ok(stored),
            BalanceWidth::TruncatedU32 => {
                let mut low = [0u8; LEGACY_AMOUNT_READ_SIZE];
                low.copy_from_slice(&stored.to_le_bytes()[..LEGACY_AMOUNT_READ_SIZE]);
                let truncated = u32::from_le_bytes(low) as u64;
                if truncated != stored && log::log_enabled!(log::Level::Warn) {
                    warn!(
                        "Balance of {} truncated from {} to {} by 32-bit read",
                        address, stored, truncated
                    );
                }
                Ok(truncated)
            }
        }
    }

    pub(super) fn read_total_supply(&self) -> Result<u64, LedgerError> {
        let supply = self.read_amount(StorageKey::TotalSupply)?;
        if log::log_enabled!(log::Level::Trace) {
            trace!("total supply {}", supply);
        }
        Ok(supply)
    }
}
