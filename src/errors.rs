//! Error handling for the auction-house listing sync.
//!
//! Errors fall into two groups. Startup errors (`Schema`, `Configuration`)
//! mean the process must not run sync cycles at all. Everything else aborts
//! only the current cycle; the next cycle resumes from the last committed
//! cursor.
//!
//! Unknown instruction tags and unrecognized bundle shapes are *not* errors.
//! They are ordinary return values of the decoder.

use thiserror::Error;
use std::fmt;

/// Main error type for the listing sync.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Malformed or colliding operation declarations in the schema source.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Missing or invalid configuration, such as an absent genesis signature
    /// when no cursor has been committed yet.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// RPC failure while fetching signatures or transaction bodies.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The ledger returned no body for a signature it listed.
    #[error("Transaction {0} is not available yet")]
    TransactionUnavailable(String),

    /// The atomic delta-and-cursor write failed. The cursor did not advance.
    #[error("Commit error: {0}")]
    Commit(String),

    /// Store access outside of the commit path failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Another sync cycle is still running.
    #[error("A sync cycle is already in progress")]
    CycleInProgress,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Whether this error must stop the process instead of a single cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Schema(_) | SyncError::Configuration(_))
    }
}

/// Result type alias for the listing sync.
pub type SyncResult<T> = Result<T, SyncError>;

/// Where an error happened.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Component where the error occurred (e.g., "monitor").
    pub component: String,

    /// Operation being performed (e.g., "get_transaction").
    pub operation: String,

    /// Ledger signature being handled, if any.
    pub signature: Option<String>,
}

impl ErrorContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "In {} while {}", self.component, self.operation)?;
        if let Some(signature) = &self.signature {
            write!(f, " for signature {}", signature)?;
        }
        Ok(())
    }
}

/// Extension trait for turning foreign errors into `SyncError`s with context.
pub trait ErrorExt<T> {
    /// Wrap a ledger RPC failure.
    fn rpc_context(self, context: ErrorContext) -> SyncResult<T>;

    /// Wrap a failure of the atomic delta-and-cursor write.
    fn commit_context(self, context: ErrorContext) -> SyncResult<T>;

    /// Wrap any other store failure.
    fn storage_context(self, context: ErrorContext) -> SyncResult<T>;
}

impl<T, E: fmt::Display> ErrorExt<T> for Result<T, E> {
    fn rpc_context(self, context: ErrorContext) -> SyncResult<T> {
        self.map_err(|e| SyncError::Rpc(format!("{}: {}", context, e)))
    }

    fn commit_context(self, context: ErrorContext) -> SyncResult<T> {
        self.map_err(|e| SyncError::Commit(format!("{}: {}", context, e)))
    }

    fn storage_context(self, context: ErrorContext) -> SyncResult<T> {
        self.map_err(|e| SyncError::Storage(format!("{}: {}", context, e)))
    }
}
