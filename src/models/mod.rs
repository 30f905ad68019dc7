//! Data models for the decode and sync pipeline

pub mod idl;
pub mod instruction;
pub mod delta;
pub mod transaction;

pub use self::idl::{IdlDocument, OperationDeclaration};
pub use self::instruction::{AccountWithRole, ClassifiedInstruction, RawInstruction};
pub use self::delta::LedgerDelta;
pub use self::transaction::{LedgerTransaction, SignatureInfo};
