//! Instruction classification against the discriminator table

use log::debug;
use std::sync::Arc;

use crate::constants::anchor::DISCRIMINATOR_LEN;
use crate::decoder::table::DiscriminatorTable;
use crate::models::instruction::{AccountWithRole, ClassifiedInstruction, RawInstruction};
use crate::utils::hash::discriminator_hex;

/// Classifies raw instructions. Pure apart from reading the shared table.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: Arc<DiscriminatorTable>,
}

impl Classifier {
    pub fn new(table: Arc<DiscriminatorTable>) -> Self {
        Self { table }
    }

    /// Classify base58 instruction data plus the addresses it references.
    ///
    /// Undecodable data, short data and unregistered tags all come back as
    /// [`ClassifiedInstruction::unknown`].
    pub fn classify(&self, encoded_data: &str, account_addresses: &[String]) -> ClassifiedInstruction {
        let Some(tag) = decode_tag(encoded_data) else {
            debug!("Instruction data too short or not base58, classified as unknown");
            return ClassifiedInstruction::unknown();
        };

        match self.table.lookup(&tag) {
            Some(schema) => ClassifiedInstruction {
                name: schema.name.clone(),
                accounts: bind_roles(&schema.roles, account_addresses),
            },
            None => {
                debug!("Unknown discriminator {}", discriminator_hex(&tag));
                ClassifiedInstruction::unknown()
            }
        }
    }

    pub fn classify_raw(&self, instruction: &RawInstruction) -> ClassifiedInstruction {
        self.classify(&instruction.data, &instruction.accounts)
    }
}

/// First eight bytes of base58 instruction data
pub fn decode_tag(encoded_data: &str) -> Option<[u8; DISCRIMINATOR_LEN]> {
    let bytes = bs58::decode(encoded_data).into_vec().ok()?;
    bytes.get(..DISCRIMINATOR_LEN)?.try_into().ok()
}

/// Bind account addresses to roles by position.
///
/// Roles and addresses are zipped index by index and truncated to the
/// shorter list; names are never compared. Trailing optional accounts may
/// be absent from the instruction.
pub fn bind_roles(roles: &[String], account_addresses: &[String]) -> Vec<AccountWithRole> {
    roles
        .iter()
        .zip(account_addresses)
        .map(|(role, address)| AccountWithRole {
            role: role.clone(),
            address: address.clone(),
        })
        .collect()
}
