//! Sled-backed listing store

use async_trait::async_trait;
use log::debug;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use std::path::Path;

use super::ListingStore;
use crate::constants::store::{CURSOR_KEY, LISTINGS_TREE, META_TREE};
use crate::errors::{ErrorContext, ErrorExt, SyncError, SyncResult};
use crate::models::delta::LedgerDelta;

/// Listing store on an embedded sled database.
///
/// Listings live in their own tree with empty values; the cursor lives in a
/// meta tree. A commit is a transaction across both trees.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    listings: sled::Tree,
    meta: sled::Tree,
}

impl SledStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let context = || ErrorContext::new("sled_store", "open");
        let db = sled::open(path).storage_context(context())?;
        let listings = db.open_tree(LISTINGS_TREE).storage_context(context())?;
        let meta = db.open_tree(META_TREE).storage_context(context())?;

        Ok(Self { db, listings, meta })
    }

    /// Flush to disk
    pub async fn flush(&self) -> SyncResult<()> {
        self.db
            .flush_async()
            .await
            .storage_context(ErrorContext::new("sled_store", "flush"))?;
        Ok(())
    }
}

#[async_trait]
impl ListingStore for SledStore {
    async fn cursor(&self) -> SyncResult<Option<String>> {
        let value = self
            .meta
            .get(CURSOR_KEY)
            .storage_context(ErrorContext::new("sled_store", "read_cursor"))?;

        match value {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| SyncError::Storage(format!("Cursor is not valid UTF-8: {}", e))),
            None => Ok(None),
        }
    }

    async fn commit(&self, delta: &LedgerDelta, signature: &str) -> SyncResult<()> {
        let context = || ErrorContext::new("sled_store", "commit").with_signature(signature);

        (&self.listings, &self.meta)
            .transaction(|(listings, meta)| {
                for (receipt, change) in delta.iter() {
                    if change > 0 {
                        listings.insert(receipt.as_bytes(), Vec::<u8>::new())?;
                    } else if change < 0 {
                        listings.remove(receipt.as_bytes())?;
                    }
                }
                meta.insert(CURSOR_KEY.as_bytes(), signature.as_bytes())?;
                Ok::<(), ConflictableTransactionError<()>>(())
            })
            .map_err(|e| format!("{:?}", e))
            .commit_context(context())?;

        self.db
            .flush_async()
            .await
            .commit_context(context())?;

        debug!("Committed {} change(s) at {}", delta.len(), signature);
        Ok(())
    }

    async fn active_listings(&self) -> SyncResult<Vec<String>> {
        let context = || ErrorContext::new("sled_store", "list_keys");
        let mut receipts = Vec::new();
        for key in self.listings.iter().keys() {
            let key = key.storage_context(context())?;
            receipts.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(receipts)
    }

    async fn contains(&self, receipt: &str) -> SyncResult<bool> {
        self.listings
            .contains_key(receipt.as_bytes())
            .storage_context(ErrorContext::new("sled_store", "contains"))
    }

    async fn reset_cursor(&self) -> SyncResult<()> {
        self.meta
            .remove(CURSOR_KEY)
            .storage_context(ErrorContext::new("sled_store", "reset_cursor"))?;
        self.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledStore::open(dir.path()).unwrap();
            assert_eq!(store.cursor().await.unwrap(), None);

            let delta: LedgerDelta = vec![("R1", 1), ("R2", 1)].into_iter().collect();
            store.commit(&delta, "sig-1").await.unwrap();

            let removal: LedgerDelta = vec![("R2", -1)].into_iter().collect();
            store.commit(&removal, "sig-2").await.unwrap();
        }

        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.cursor().await.unwrap().as_deref(), Some("sig-2"));
        assert_eq!(store.active_listings().await.unwrap(), vec!["R1".to_string()]);
        assert!(store.contains("R1").await.unwrap());
        assert!(!store.contains("R2").await.unwrap());
    }

    #[tokio::test]
    async fn test_reinsert_keeps_single_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        let delta: LedgerDelta = vec![("R1", 1)].into_iter().collect();

        store.commit(&delta, "sig-1").await.unwrap();
        store.commit(&delta, "sig-1").await.unwrap();
        assert_eq!(store.active_listings().await.unwrap().len(), 1);

        store.reset_cursor().await.unwrap();
        assert_eq!(store.cursor().await.unwrap(), None);
        assert!(store.contains("R1").await.unwrap());
    }
}
