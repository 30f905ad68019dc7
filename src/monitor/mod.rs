//! Ledger access for the sync engine

mod rpc;
pub mod transaction;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_pubkey::Pubkey;

use crate::constants::MAX_SIGNATURE_PAGE;
use crate::errors::SyncResult;
use crate::models::transaction::{LedgerTransaction, SignatureInfo};

/// What the sync engine needs from the ledger
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Every signature for `address` newer than `until`, most recent first
    async fn signatures_since(&self, address: &Pubkey, until: &str) -> SyncResult<Vec<SignatureInfo>>;

    /// Full transaction for `signature`, or `None` if the node has no body
    /// for it yet
    async fn transaction(&self, signature: &str) -> SyncResult<Option<LedgerTransaction>>;
}

/// Monitor for observing auction-house transactions over JSON-RPC
pub struct Monitor {
    rpc_client: RpcClient,
    page_limit: usize,
}

impl Monitor {
    /// Create a new monitor with the given RPC URL
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc_client: RpcClient::new(rpc_url.to_string()),
            page_limit: MAX_SIGNATURE_PAGE,
        }
    }

    /// Signatures requested per `getSignaturesForAddress` page
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.clamp(1, MAX_SIGNATURE_PAGE);
        self
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[async_trait]
impl LedgerRpc for Monitor {
    async fn signatures_since(&self, address: &Pubkey, until: &str) -> SyncResult<Vec<SignatureInfo>> {
        rpc::get_signatures_since(&self.rpc_client, address, until, self.page_limit).await
    }

    async fn transaction(&self, signature: &str) -> SyncResult<Option<LedgerTransaction>> {
        match rpc::get_transaction(&self.rpc_client, signature).await? {
            Some(encoded) => transaction::from_encoded(signature, encoded).map(Some),
            None => Ok(None),
        }
    }
}
