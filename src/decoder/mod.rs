//! Instruction decoding for auction-house transactions
//!
//! The pipeline is: base58 data → 8-byte tag → [`DiscriminatorTable`] lookup
//! → roles bound to accounts by position → bundle shape → [`LedgerDelta`].

pub mod table;
pub mod classifier;
pub mod bundle;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::models::instruction::ClassifiedInstruction;
use crate::models::transaction::LedgerTransaction;

pub use self::table::{DiscriminatorTable, OperationSchema};
pub use self::classifier::{bind_roles, Classifier};
pub use self::bundle::{interpret, BundleShape, Interpretation, ListingEvent, KNOWN_SHAPES};

/// Decodes whole transactions for one target program
#[derive(Debug, Clone)]
pub struct Decoder {
    classifier: Classifier,
    program_id: String,
}

impl Decoder {
    pub fn new(table: Arc<DiscriminatorTable>, program_id: &str) -> Self {
        Self {
            classifier: Classifier::new(table),
            program_id: program_id.to_string(),
        }
    }

    /// Classified instructions of the target program, in on-chain order
    pub fn bundle(&self, transaction: &LedgerTransaction) -> Vec<ClassifiedInstruction> {
        transaction
            .instructions_for(&self.program_id)
            .map(|ix| self.classifier.classify_raw(ix))
            .collect()
    }

    /// Interpret a transaction. Failed transactions changed nothing on chain
    /// and are always unrecognized.
    pub fn interpret(&self, transaction: &LedgerTransaction) -> Interpretation {
        if transaction.failed {
            return Interpretation::unrecognized();
        }
        interpret(&self.bundle(transaction))
    }
}
