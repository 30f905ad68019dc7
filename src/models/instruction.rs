//! Instruction models for the decode pipeline

use serde::{Serialize, Deserialize};
use crate::constants::anchor::UNKNOWN_INSTRUCTION;

/// One instruction as it appears in a ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInstruction {
    /// Program the instruction invokes
    pub program_id: String,
    /// Base58-encoded instruction data
    pub data: String,
    /// Referenced account addresses, in instruction order
    pub accounts: Vec<String>,
}

/// An account address bound to the role the schema declares at its position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWithRole {
    pub role: String,
    pub address: String,
}

/// Result of classifying one instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedInstruction {
    /// snake_case operation name, or `"unknown"`
    pub name: String,
    /// Accounts bound to roles
    pub accounts: Vec<AccountWithRole>,
}

impl RawInstruction {
    pub fn new(program_id: &str, data: &str, accounts: &[&str]) -> Self {
        Self {
            program_id: program_id.to_string(),
            data: data.to_string(),
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl ClassifiedInstruction {
    /// The instruction whose tag is not in the table
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_INSTRUCTION.to_string(),
            accounts: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_INSTRUCTION
    }

    /// Addresses of every account bound to `role`, in account order
    pub fn addresses_with_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.accounts
            .iter()
            .filter(move |a| a.role == role)
            .map(|a| a.address.as_str())
    }
}
