//! YAML scenario parser
//!
//! - Amounts accept numbers or strings (`amount: "18446744073709551615"`)
//! - `caller` defaults to the scenario creator
//! - `expect_error` names the expected `LedgerError` variant; a step without
//!   it must succeed

use std::{collections::BTreeMap, fmt};

use anyhow::Result;
use qash_common::{crypto::Address, error::LedgerError, policy::LedgerConfig};
use serde::{Deserialize, Serialize};
use strum::{IntoStaticStr, VariantNames};

/// Complete test scenario loaded from YAML
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TestScenario {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ledger configuration, the QASH preset when omitted
    #[serde(default)]
    pub config: LedgerConfig,

    /// Account that deployed the contract
    pub creator: String,

    /// Named accounts with explicit addresses
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub accounts: BTreeMap<String, Address>,

    pub steps: Vec<Step>,
}

/// One invocation or assertion
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Step {
    /// Invoking account, the creator when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,

    #[serde(flatten)]
    pub action: Action,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_error: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, IntoStaticStr)]
#[serde(tag = "action", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Initialize {
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        supply: u64,
    },
    ChangeOwner {
        new_owner: String,
    },
    Pause,
    Unpause,
    Mint {
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        amount: u64,
    },
    Transfer {
        to: String,
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        amount: u64,
        #[serde(default, deserialize_with = "deserialize_u64_from_string_or_number")]
        memo: u64,
    },
    Approve {
        spender: String,
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        amount: u64,
    },
    TransferFrom {
        from: String,
        to: String,
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        amount: u64,
        #[serde(default, deserialize_with = "deserialize_u64_from_string_or_number")]
        memo: u64,
    },

    // Queries, their result is recorded in the report
    GetOwner,
    IsOwner,
    GetBalance {
        account: String,
    },
    GetAllowance {
        owner: String,
        spender: String,
    },
    GetTotalSupply,
    GetDecimals,
    GetSymbol,

    // Assertions, a mismatch fails the scenario
    AssertBalance {
        account: String,
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        eq: u64,
    },
    AssertAllowance {
        owner: String,
        spender: String,
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        eq: u64,
    },
    AssertTotalSupply {
        #[serde(deserialize_with = "deserialize_u64_from_string_or_number")]
        eq: u64,
    },
    AssertOwner {
        account: String,
    },
    AssertPaused {
        eq: bool,
    },
}

impl Action {
    /// Snake case action name, as written in YAML
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Account names referenced by this action
    pub fn accounts(&self) -> Vec<&str> {
        match self {
            Self::ChangeOwner { new_owner } => vec![new_owner.as_str()],
            Self::Transfer { to, .. } => vec![to.as_str()],
            Self::Approve { spender, .. } => vec![spender.as_str()],
            Self::TransferFrom { from, to, .. } => vec![from.as_str(), to.as_str()],
            Self::GetBalance { account }
            | Self::AssertBalance { account, .. }
            | Self::AssertOwner { account } => vec![account.as_str()],
            Self::GetAllowance { owner, spender } | Self::AssertAllowance { owner, spender, .. } => {
                vec![owner.as_str(), spender.as_str()]
            }
            _ => Vec::new(),
        }
    }
}

/// Accepts u64 as string or number
fn deserialize_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a u64 as number or string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(value)
                .map_err(|_| de::Error::custom(format!("negative value not allowed: {}", value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value.parse::<u64>().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

/// Parse and validate a YAML scenario
pub fn parse_scenario(yaml: &str) -> Result<TestScenario> {
    let scenario: TestScenario = serde_yaml::from_str(yaml)
        .map_err(|e| anyhow::anyhow!("Failed to parse YAML scenario: {}", e))?;

    validate_scenario(&scenario)?;

    Ok(scenario)
}

fn validate_scenario(scenario: &TestScenario) -> Result<()> {
    anyhow::ensure!(!scenario.name.is_empty(), "Scenario name cannot be empty");
    anyhow::ensure!(!scenario.creator.is_empty(), "Scenario creator cannot be empty");
    anyhow::ensure!(
        !scenario.steps.is_empty(),
        "Scenario must have at least one step"
    );

    scenario
        .config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid ledger config: {}", e))?;

    for (index, step) in scenario.steps.iter().enumerate() {
        if let Some(name) = &step.expect_error {
            anyhow::ensure!(
                LedgerError::VARIANTS.contains(&name.as_str()),
                "Step {}: unknown error name {}",
                index + 1,
                name
            );
        }

        let caller = step.caller.iter().map(String::as_str);
        for account in caller.chain(step.action.accounts()) {
            anyhow::ensure!(
                !account.is_empty(),
                "Step {}: account name cannot be empty",
                index + 1
            );
        }
    }

    Ok(())
}
