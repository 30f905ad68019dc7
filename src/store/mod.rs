//! Durable listing state
//!
//! Two things are stored: the set of active listing receipts and the sync
//! cursor. Both change only through [`ListingStore::commit`], which applies a
//! delta and moves the cursor as one atomic write.

pub mod memory;
pub mod sled;

use async_trait::async_trait;

use crate::errors::SyncResult;
use crate::models::delta::LedgerDelta;

pub use self::memory::MemoryStore;
pub use self::sled::SledStore;

/// Store of active listings plus the sync cursor
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Last fully processed ledger signature, if any
    async fn cursor(&self) -> SyncResult<Option<String>>;

    /// Apply `delta` and set the cursor to `signature`, atomically.
    ///
    /// Positive changes insert the receipt, negative changes remove it, zero
    /// does nothing. Inserting a present key or removing an absent key is a
    /// no-op. On error nothing was written.
    async fn commit(&self, delta: &LedgerDelta, signature: &str) -> SyncResult<()>;

    /// All active listing receipts, in key order
    async fn active_listings(&self) -> SyncResult<Vec<String>>;

    /// Is `receipt` currently listed?
    async fn contains(&self, receipt: &str) -> SyncResult<bool>;

    /// Forget the cursor so the next cycle starts from genesis
    async fn reset_cursor(&self) -> SyncResult<()>;
}
