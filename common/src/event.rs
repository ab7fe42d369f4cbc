use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::crypto::Address;

/// Domain events reported to the host, in emission order.
///
/// Events are fire-and-forget: the ledger never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    Owner {
        owner: Address,
    },
    ChangeOwner {
        old_owner: Address,
        new_owner: Address,
    },
    Mint {
        to: Address,
        amount: u64,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: u64,
        memo: u64,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: u64,
    },
    Pause,
    Unpause,
}

impl LedgerEvent {
    /// Host-side event name, e.g. `"Transfer"`
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
