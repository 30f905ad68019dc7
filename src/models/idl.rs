//! Anchor IDL model, as far as the discriminator table needs it

use serde::{Serialize, Deserialize};

/// Trimmed auction-house IDL shipped with the crate
pub const BUILTIN_AUCTION_HOUSE_IDL: &str = include_str!("../../idl/auction_house.json");

/// Interface Description Language (IDL) document emitted by Anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlDocument {
    /// Program name
    #[serde(default)]
    pub name: Option<String>,
    /// Program version
    #[serde(default)]
    pub version: Option<String>,
    /// Declared instructions
    pub instructions: Vec<IdlInstruction>,
}

/// One declared instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlInstruction {
    /// Instruction name, usually camelCase
    #[serde(default)]
    pub name: String,
    /// Account list in ledger order; groups nest
    #[serde(default)]
    pub accounts: Vec<IdlAccountItem>,
}

/// Either a plain account or a named group of accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlAccountItem {
    Group(IdlAccountGroup),
    Account(IdlAccount),
}

/// Composite account group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlAccountGroup {
    pub name: String,
    pub accounts: Vec<IdlAccountItem>,
}

/// Single account used by an instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlAccount {
    /// Account name, which becomes the role
    pub name: String,
    /// Is this account writable?
    #[serde(default, alias = "isMut", alias = "writable")]
    pub is_mut: bool,
    /// Is this account a signer?
    #[serde(default, alias = "isSigner", alias = "signer")]
    pub is_signer: bool,
}

/// An operation as declared by the schema source, before normalisation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDeclaration {
    /// Name in arbitrary casing
    pub name: String,
    /// Ordered account roles
    pub roles: Vec<String>,
}

impl IdlDocument {
    /// Parse an IDL document from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Operation declarations in IDL order
    pub fn declarations(&self) -> Vec<OperationDeclaration> {
        self.instructions
            .iter()
            .map(|ix| OperationDeclaration {
                name: ix.name.clone(),
                roles: ix.roles(),
            })
            .collect()
    }
}

impl IdlInstruction {
    /// Account roles with groups flattened depth-first, in declaration order
    pub fn roles(&self) -> Vec<String> {
        let mut roles = Vec::new();
        flatten_accounts(&self.accounts, &mut roles);
        roles
    }
}

fn flatten_accounts(items: &[IdlAccountItem], out: &mut Vec<String>) {
    for item in items {
        match item {
            IdlAccountItem::Account(account) => out.push(account.name.clone()),
            IdlAccountItem::Group(group) => flatten_accounts(&group.accounts, out),
        }
    }
}

impl OperationDeclaration {
    pub fn new(name: &str, roles: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}
