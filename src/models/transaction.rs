//! Ledger transaction model

use serde::{Serialize, Deserialize};
use crate::models::instruction::RawInstruction;

/// A signature listed for an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    /// Did the transaction fail on chain?
    pub failed: bool,
}

/// A fetched transaction body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub signature: String,
    pub slot: u64,
    /// Did the transaction fail on chain?
    pub failed: bool,
    /// Top-level instructions in on-chain order
    pub instructions: Vec<RawInstruction>,
}

impl SignatureInfo {
    pub fn new(signature: &str) -> Self {
        Self {
            signature: signature.to_string(),
            slot: 0,
            failed: false,
        }
    }
}

impl LedgerTransaction {
    /// Instructions invoking `program_id`, in their original order
    pub fn instructions_for<'a>(&'a self, program_id: &'a str) -> impl Iterator<Item = &'a RawInstruction> + 'a {
        self.instructions
            .iter()
            .filter(move |ix| ix.program_id == program_id)
    }
}
