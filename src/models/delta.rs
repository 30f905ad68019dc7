//! Signed changes to the active-listing set

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Mapping from receipt address to a signed change.
///
/// Positive values insert the receipt into the active-listing set, negative
/// values remove it, zero leaves it alone. Changes to the same key add up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDelta {
    changes: BTreeMap<String, i64>,
}

impl LedgerDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `change` to the accumulator for `receipt`
    pub fn add(&mut self, receipt: &str, change: i64) {
        *self.changes.entry(receipt.to_string()).or_insert(0) += change;
    }

    /// Merge another delta into this one additively
    pub fn merge(&mut self, other: &LedgerDelta) {
        for (receipt, change) in &other.changes {
            self.add(receipt, *change);
        }
    }

    pub fn get(&self, receipt: &str) -> Option<i64> {
        self.changes.get(receipt).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Receipts this delta inserts
    pub fn insertions(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, v)| *v > 0).map(|(k, _)| k)
    }

    /// Receipts this delta removes
    pub fn removals(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, v)| *v < 0).map(|(k, _)| k)
    }
}

impl<'a> FromIterator<(&'a str, i64)> for LedgerDelta {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        let mut delta = LedgerDelta::new();
        for (receipt, change) in iter {
            delta.add(receipt, change);
        }
        delta
    }
}
