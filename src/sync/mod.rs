//! Ledger sync engine
//!
//! One cycle reads the cursor, lists newer signatures, and walks them oldest
//! first. Each transaction is decoded into a delta, and that delta is
//! committed together with the cursor advance as one atomic store write.
//! Any RPC or store failure aborts the cycle; nothing past the last commit
//! is assumed, so the next cycle resumes cleanly.

mod report;

use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use crate::config::ValidatedConfig;
use crate::decoder::{Decoder, DiscriminatorTable, Interpretation};
use crate::errors::{SyncError, SyncResult};
use crate::models::delta::LedgerDelta;
use crate::models::transaction::{LedgerTransaction, SignatureInfo};
use crate::monitor::LedgerRpc;
use crate::store::ListingStore;

pub use self::report::{SyncOutcome, SyncReport};

/// Where a cycle is. Logged on every transition.
///
/// `CommittingAll` is entered around each transaction's atomic commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    FetchingSignatures,
    NoNewWork,
    ProcessingBatch,
    CommittingAll,
}

/// Drives sync cycles against injected ledger and store collaborators
pub struct SyncEngine {
    config: ValidatedConfig,
    decoder: Decoder,
    rpc: Arc<dyn LedgerRpc>,
    store: Arc<dyn ListingStore>,
    cycle_lock: Mutex<()>,
    phase: StdMutex<SyncPhase>,
}

impl SyncEngine {
    pub fn new(
        config: ValidatedConfig,
        table: Arc<DiscriminatorTable>,
        rpc: Arc<dyn LedgerRpc>,
        store: Arc<dyn ListingStore>,
    ) -> Self {
        let decoder = Decoder::new(table, &config.program_id.to_string());
        Self {
            config,
            decoder,
            rpc,
            store,
            cycle_lock: Mutex::new(()),
            phase: StdMutex::new(SyncPhase::Idle),
        }
    }

    /// Phase of the cycle in flight, `Idle` between cycles
    pub fn phase(&self) -> SyncPhase {
        self.phase.lock().map(|phase| *phase).unwrap_or(SyncPhase::Idle)
    }

    /// Run one cycle to completion.
    ///
    /// Fails with [`SyncError::CycleInProgress`] if another cycle on this
    /// engine has not finished.
    pub async fn run_cycle(&self) -> SyncResult<SyncReport> {
        let _guard = self
            .cycle_lock
            .try_lock()
            .map_err(|_| SyncError::CycleInProgress)?;

        let result = self.cycle().await;
        self.enter(SyncPhase::Idle);
        if let Err(e) = &result {
            warn!("Sync cycle aborted: {}", e);
        }
        result
    }

    async fn cycle(&self) -> SyncResult<SyncReport> {
        let cursor = self.starting_cursor().await?;

        self.enter(SyncPhase::FetchingSignatures);
        let mut signatures = self
            .rpc
            .signatures_since(&self.config.auction_house, &cursor)
            .await?;

        if signatures.is_empty() {
            self.enter(SyncPhase::NoNewWork);
            info!("No new signatures since {}", cursor);
            return Ok(SyncReport::no_new_work(&cursor));
        }

        // The ledger lists newest first; deltas must apply in ledger order
        signatures.reverse();

        info!("Processing {} new signature(s) since {}", signatures.len(), cursor);
        let mut report = SyncReport::started(&cursor);
        let mut seen: HashSet<String> = HashSet::new();

        for signature in &signatures {
            if signature.signature == cursor || !seen.insert(signature.signature.clone()) {
                debug!("Skipping already handled signature {}", signature.signature);
                report.duplicates_skipped += 1;
                continue;
            }
            self.enter(SyncPhase::ProcessingBatch);
            self.process_signature(signature, &mut report).await?;
        }

        info!(
            "Sync cycle complete: {} processed, cursor at {}",
            report.processed, report.cursor
        );
        Ok(report)
    }

    /// Committed cursor, or the configured genesis signature
    async fn starting_cursor(&self) -> SyncResult<String> {
        match self.store.cursor().await? {
            Some(cursor) => Ok(cursor),
            None => self.config.genesis_signature.clone().ok_or_else(|| {
                SyncError::Configuration(
                    "No cursor has been committed and no genesis signature is configured"
                        .to_string(),
                )
            }),
        }
    }

    async fn process_signature(&self, signature: &SignatureInfo, report: &mut SyncReport) -> SyncResult<()> {
        // Failed on chain: changed nothing, but the cursor still moves past it
        let (interpretation, failed) = if signature.failed {
            (Interpretation::unrecognized(), true)
        } else {
            let transaction = self.fetch_transaction(&signature.signature).await?;
            (self.decoder.interpret(&transaction), transaction.failed)
        };

        let mut delta = LedgerDelta::new();
        delta.merge(&interpretation.delta);

        self.enter(SyncPhase::CommittingAll);
        self.store.commit(&delta, &signature.signature).await?;

        if delta.is_empty() {
            debug!("{}: {} (no changes)", signature.signature, interpretation.event);
        } else {
            info!(
                "{}: {} {:?}",
                signature.signature,
                interpretation.event,
                delta.iter().collect::<Vec<_>>()
            );
        }
        report.record(&signature.signature, failed, interpretation.event);
        Ok(())
    }

    /// Fetch and interpret one transaction without committing anything
    pub async fn interpret_signature(&self, signature: &str) -> SyncResult<Interpretation> {
        let transaction = self.fetch_transaction(signature).await?;
        Ok(self.decoder.interpret(&transaction))
    }

    async fn fetch_transaction(&self, signature: &str) -> SyncResult<LedgerTransaction> {
        let transaction = self
            .rpc
            .transaction(signature)
            .await?
            .ok_or_else(|| SyncError::TransactionUnavailable(signature.to_string()))?;

        if transaction.failed {
            debug!("{} failed on chain, ignoring its instructions", signature);
        }
        Ok(transaction)
    }

    fn enter(&self, phase: SyncPhase) {
        debug!("Sync phase: {:?}", phase);
        if let Ok(mut current) = self.phase.lock() {
            *current = phase;
        }
    }
}
