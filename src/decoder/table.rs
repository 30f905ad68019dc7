//! Discriminator table: 8-byte Anchor tag → declared operation

use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

use crate::constants::anchor::DISCRIMINATOR_LEN;
use crate::errors::{SyncError, SyncResult};
use crate::models::idl::{IdlDocument, OperationDeclaration, BUILTIN_AUCTION_HOUSE_IDL};
use crate::utils::anchor::to_snake_case;
use crate::utils::hash::{discriminator_hex, generate_anchor_discriminator};

/// A declared operation after name normalisation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSchema {
    /// Canonical snake_case name
    pub name: String,
    /// Account roles by position
    pub roles: Vec<String>,
}

/// Read-only lookup from instruction tag to operation.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DiscriminatorTable {
    entries: HashMap<[u8; DISCRIMINATOR_LEN], OperationSchema>,
}

impl DiscriminatorTable {
    /// An empty table. Every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from operation declarations
    pub fn build(declarations: &[OperationDeclaration]) -> SyncResult<Self> {
        let mut table = Self::new();
        table.rebuild(declarations)?;
        Ok(table)
    }

    /// Table for the auction-house IDL embedded in the crate
    pub fn builtin() -> SyncResult<Self> {
        Self::from_idl_json(BUILTIN_AUCTION_HOUSE_IDL)
    }

    /// Table for an IDL document held in memory
    pub fn from_idl_json(json: &str) -> SyncResult<Self> {
        let idl = IdlDocument::from_json(json)
            .map_err(|e| SyncError::Schema(format!("Invalid IDL document: {}", e)))?;
        Self::build(&idl.declarations())
    }

    /// Table for an IDL file on disk
    pub fn load(path: &Path) -> SyncResult<Self> {
        info!("Loading instruction schema from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_idl_json(&json)
    }

    /// Replace the table's contents with `declarations`.
    ///
    /// On error the previous contents are left untouched.
    pub fn rebuild(&mut self, declarations: &[OperationDeclaration]) -> SyncResult<()> {
        let mut entries: HashMap<[u8; DISCRIMINATOR_LEN], OperationSchema> = HashMap::new();
        let mut declared_as: HashMap<String, &str> = HashMap::new();

        for declaration in declarations {
            let raw_name = declaration.name.trim();
            if raw_name.is_empty() {
                return Err(SyncError::Schema("Operation declared without a name".to_string()));
            }
            if declaration.roles.is_empty() {
                return Err(SyncError::Schema(format!(
                    "Operation '{}' declares no accounts",
                    raw_name
                )));
            }
            if let Some(role) = declaration.roles.iter().find(|r| r.trim().is_empty()) {
                return Err(SyncError::Schema(format!(
                    "Operation '{}' declares an account with an empty name ({:?})",
                    raw_name, role
                )));
            }

            let name = to_snake_case(raw_name);
            if let Some(previous) = declared_as.insert(name.clone(), raw_name) {
                return Err(SyncError::Schema(format!(
                    "Operations '{}' and '{}' both normalise to '{}'",
                    previous, raw_name, name
                )));
            }

            let tag = generate_anchor_discriminator(&name);
            if let Some(existing) = entries.get(&tag) {
                return Err(SyncError::Schema(format!(
                    "Discriminator {} collides for '{}' and '{}'",
                    discriminator_hex(&tag),
                    existing.name,
                    name
                )));
            }

            debug!("{} -> {} ({} accounts)", discriminator_hex(&tag), name, declaration.roles.len());
            entries.insert(tag, OperationSchema {
                name,
                roles: declaration.roles.clone(),
            });
        }

        self.entries = entries;
        Ok(())
    }

    /// Look up the operation for a tag. Anything other than exactly eight
    /// bytes misses.
    pub fn lookup(&self, tag: &[u8]) -> Option<&OperationSchema> {
        let tag: [u8; DISCRIMINATOR_LEN] = tag.try_into().ok()?;
        self.entries.get(&tag)
    }

    /// Tag registered for a snake_case operation name
    pub fn tag_for(&self, name: &str) -> Option<[u8; DISCRIMINATOR_LEN]> {
        self.entries
            .iter()
            .find(|(_, schema)| schema.name == name)
            .map(|(tag, _)| *tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
