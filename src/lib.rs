//! Keeps a derived set of active auction-house listings in sync with the
//! Solana ledger.
//!
//! Instructions of the auction-house program are identified by their 8-byte
//! Anchor discriminator, grouped per transaction, and matched against the
//! known listing, cancellation and sale shapes. Each transaction's effect on
//! the listing set is committed together with the sync cursor.

pub mod api;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod errors;
pub mod models;
pub mod monitor;
pub mod store;
pub mod sync;
pub mod utils;

use log::info;
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::decoder::DiscriminatorTable;
use crate::errors::SyncResult;
use crate::monitor::Monitor;
use crate::store::{ListingStore, SledStore};
use crate::sync::SyncEngine;

/// Build the discriminator table from the configured IDL, or the embedded one
pub fn load_table(config: &SyncConfig) -> SyncResult<DiscriminatorTable> {
    let table = match &config.idl_path {
        Some(path) => DiscriminatorTable::load(path)?,
        None => DiscriminatorTable::builtin()?,
    };
    info!("Discriminator table ready with {} operations", table.len());
    Ok(table)
}

/// Open the sled store at the configured path
pub fn open_store(config: &SyncConfig) -> SyncResult<Arc<SledStore>> {
    info!("Opening listing store at {}", config.db_path.display());
    Ok(Arc::new(SledStore::open(&config.db_path)?))
}

/// Wire a production engine: JSON-RPC ledger access over `store`.
///
/// Fails on schema or configuration errors, before any cycle runs.
pub fn build_engine(config: &SyncConfig, store: Arc<dyn ListingStore>) -> SyncResult<SyncEngine> {
    let validated = config.validate()?;
    let table = Arc::new(load_table(config)?);
    let monitor = Monitor::new(&validated.rpc_url).with_page_limit(validated.page_limit);
    info!(
        "Syncing auction house {} (program {}) via {}",
        validated.auction_house,
        validated.program_id,
        monitor.url()
    );
    Ok(SyncEngine::new(validated, table, Arc::new(monitor), store))
}

/// Version of the listing sync
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
