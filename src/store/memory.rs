//! In-memory listing store, for tests and dry runs

use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

use super::ListingStore;
use crate::errors::SyncResult;
use crate::models::delta::LedgerDelta;

#[derive(Debug, Default)]
struct State {
    listings: BTreeSet<String>,
    cursor: Option<String>,
}

/// Listing store held in memory. One lock guards both listings and cursor,
/// which makes every commit atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a cursor
    pub fn with_cursor(signature: &str) -> Self {
        Self {
            state: RwLock::new(State {
                listings: BTreeSet::new(),
                cursor: Some(signature.to_string()),
            }),
        }
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn cursor(&self) -> SyncResult<Option<String>> {
        Ok(self.state.read().await.cursor.clone())
    }

    async fn commit(&self, delta: &LedgerDelta, signature: &str) -> SyncResult<()> {
        let mut state = self.state.write().await;
        for (receipt, change) in delta.iter() {
            if change > 0 {
                state.listings.insert(receipt.to_string());
            } else if change < 0 {
                state.listings.remove(receipt);
            }
        }
        state.cursor = Some(signature.to_string());
        Ok(())
    }

    async fn active_listings(&self) -> SyncResult<Vec<String>> {
        Ok(self.state.read().await.listings.iter().cloned().collect())
    }

    async fn contains(&self, receipt: &str) -> SyncResult<bool> {
        Ok(self.state.read().await.listings.contains(receipt))
    }

    async fn reset_cursor(&self) -> SyncResult<()> {
        self.state.write().await.cursor = None;
        Ok(())
    }
}
