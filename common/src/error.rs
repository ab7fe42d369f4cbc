use strum::{IntoStaticStr, VariantNames};
use thiserror::Error;

use crate::keys::RecordKind;

// Exit codes reported to the host when an invocation fails
pub const ERR_NOT_INITIALIZED: u32 = 1001;
pub const ERR_ALREADY_INITIALIZED: u32 = 1002;
pub const ERR_UNAUTHORIZED: u32 = 1003;
pub const ERR_PAUSED: u32 = 1004;
pub const ERR_ALREADY_IN_TARGET_STATE: u32 = 1005;
pub const ERR_ARITHMETIC_OVERFLOW: u32 = 1006;
pub const ERR_ARITHMETIC_UNDERFLOW: u32 = 1007;
pub const ERR_MINTING_DISABLED: u32 = 1008;
pub const ERR_STORAGE: u32 = 1009;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Host rejected write of {kind} record with status {status}")]
    WriteRejected { kind: RecordKind, status: i32 },

    #[error("Corrupted {kind} record: expected {expected} bytes, found {actual}")]
    UnexpectedValueSize {
        kind: RecordKind,
        expected: usize,
        actual: usize,
    },
}

/// Every way a ledger invocation can fail.
///
/// All of them are fatal to the current invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq, IntoStaticStr, VariantNames)]
pub enum LedgerError {
    #[error("Ledger is not initialized")]
    NotInitialized,

    #[error("Ledger is already initialized")]
    AlreadyInitialized,

    #[error("Unauthorized: caller is not the owner")]
    Unauthorized,

    #[error("Ledger is paused")]
    Paused,

    #[error("Ledger is already {}", pause_state(.paused))]
    AlreadyInTargetState { paused: bool },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    // Insufficient balance and insufficient allowance both land here
    #[error("Arithmetic underflow")]
    ArithmeticUnderflow,

    #[error("Minting is disabled for this ledger")]
    MintingDisabled,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn pause_state(paused: &bool) -> &'static str {
    if *paused {
        "paused"
    } else {
        "unpaused"
    }
}

impl LedgerError {
    /// Stable numeric code, used as the guest exit status
    pub fn code(&self) -> u32 {
        match self {
            Self::NotInitialized => ERR_NOT_INITIALIZED,
            Self::AlreadyInitialized => ERR_ALREADY_INITIALIZED,
            Self::Unauthorized => ERR_UNAUTHORIZED,
            Self::Paused => ERR_PAUSED,
            Self::AlreadyInTargetState { .. } => ERR_ALREADY_IN_TARGET_STATE,
            Self::ArithmeticOverflow => ERR_ARITHMETIC_OVERFLOW,
            Self::ArithmeticUnderflow => ERR_ARITHMETIC_UNDERFLOW,
            Self::MintingDisabled => ERR_MINTING_DISABLED,
            Self::Storage(_) => ERR_STORAGE,
        }
    }

    /// Variant name, e.g. `"ArithmeticUnderflow"`
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            LedgerError::NotInitialized,
            LedgerError::AlreadyInitialized,
            LedgerError::Unauthorized,
            LedgerError::Paused,
            LedgerError::AlreadyInTargetState { paused: true },
            LedgerError::ArithmeticOverflow,
            LedgerError::ArithmeticUnderflow,
            LedgerError::MintingDisabled,
            LedgerError::Storage(StorageError::WriteRejected {
                kind: RecordKind::Balance,
                status: 1,
            }),
        ];
        let mut codes: Vec<u32> = errors.iter().map(LedgerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_names() {
        assert_eq!(LedgerError::ArithmeticUnderflow.name(), "ArithmeticUnderflow");
        assert_eq!(
            LedgerError::AlreadyInTargetState { paused: false }.name(),
            "AlreadyInTargetState"
        );
    }

    #[test]
    fn test_variant_names_match_name() {
        assert_eq!(LedgerError::VARIANTS.len(), 9);
        assert!(LedgerError::VARIANTS.contains(&LedgerError::MintingDisabled.name()));
        assert!(LedgerError::VARIANTS.contains(&"Storage"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LedgerError::AlreadyInTargetState { paused: true }.to_string(),
            "Ledger is already paused"
        );
        let err: LedgerError = StorageError::UnexpectedValueSize {
            kind: RecordKind::TotalSupply,
            expected: 8,
            actual: 3,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Corrupted total_supply record: expected 8 bytes, found 3"
        );
    }
}
