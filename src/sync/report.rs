//! Cycle reports

use serde::{Serialize, Deserialize};

use crate::decoder::ListingEvent;

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// The ledger had nothing newer than the cursor
    NoNewWork,
    /// Every fetched signature was committed
    Completed,
}

/// Summary of one successful cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    /// Cursor the cycle started from
    pub starting_cursor: String,
    /// Cursor after the cycle
    pub cursor: String,
    /// Signatures committed
    pub processed: usize,
    pub listings: usize,
    pub cancellations: usize,
    pub sales: usize,
    /// Committed without a recognized shape
    pub unrecognized: usize,
    /// Failed on chain, committed without a delta
    pub failed_skipped: usize,
    /// Repeated or already-committed signatures that were not reapplied
    pub duplicates_skipped: usize,
}

impl SyncReport {
    pub fn no_new_work(cursor: &str) -> Self {
        Self {
            outcome: SyncOutcome::NoNewWork,
            ..Self::started(cursor)
        }
    }

    pub fn started(cursor: &str) -> Self {
        Self {
            outcome: SyncOutcome::Completed,
            starting_cursor: cursor.to_string(),
            cursor: cursor.to_string(),
            processed: 0,
            listings: 0,
            cancellations: 0,
            sales: 0,
            unrecognized: 0,
            failed_skipped: 0,
            duplicates_skipped: 0,
        }
    }

    /// Count a committed signature
    pub fn record(&mut self, signature: &str, failed: bool, event: ListingEvent) {
        self.processed += 1;
        self.cursor = signature.to_string();
        if failed {
            self.failed_skipped += 1;
            return;
        }
        match event {
            ListingEvent::Listing => self.listings += 1,
            ListingEvent::Cancellation => self.cancellations += 1,
            ListingEvent::Sale => self.sales += 1,
            ListingEvent::Unrecognized => self.unrecognized += 1,
        }
    }
}
