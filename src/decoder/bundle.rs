//! Bundle interpretation: recognise listing, cancellation and sale shapes

use log::debug;
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::constants::anchor::instructions::*;
use crate::constants::anchor::roles::{LISTING_RECEIPT, RECEIPT};
use crate::models::delta::LedgerDelta;
use crate::models::instruction::ClassifiedInstruction;

/// What a transaction's bundle did to the active-listing set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingEvent {
    Listing,
    Cancellation,
    Sale,
    Unrecognized,
}

impl fmt::Display for ListingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListingEvent::Listing => "listing",
            ListingEvent::Cancellation => "cancellation",
            ListingEvent::Sale => "sale",
            ListingEvent::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// A known multi-instruction pattern.
///
/// The bundle must start with exactly `sequence`; further instructions after
/// it are ignored. Every account with `receipt_role` in the instruction at
/// `receipt_position` contributes `change`.
#[derive(Debug, Clone, Copy)]
pub struct BundleShape {
    pub event: ListingEvent,
    pub sequence: &'static [&'static str],
    pub receipt_position: usize,
    pub receipt_role: &'static str,
    pub change: i64,
}

/// Shapes tried in order; the first match wins
pub const KNOWN_SHAPES: &[BundleShape] = &[
    BundleShape {
        event: ListingEvent::Listing,
        sequence: &[SELL, PRINT_LISTING_RECEIPT],
        receipt_position: 1,
        receipt_role: RECEIPT,
        change: 1,
    },
    BundleShape {
        event: ListingEvent::Cancellation,
        sequence: &[CANCEL, CANCEL_LISTING_RECEIPT],
        receipt_position: 1,
        receipt_role: RECEIPT,
        change: -1,
    },
    BundleShape {
        event: ListingEvent::Sale,
        sequence: &[BUY, PRINT_BID_RECEIPT, EXECUTE_SALE, PRINT_PURCHASE_RECEIPT],
        receipt_position: 3,
        receipt_role: LISTING_RECEIPT,
        change: -1,
    },
];

/// The event a bundle represents and the delta it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub event: ListingEvent,
    pub delta: LedgerDelta,
}

impl BundleShape {
    /// Positional, exact prefix match
    pub fn matches(&self, bundle: &[ClassifiedInstruction]) -> bool {
        bundle.len() >= self.sequence.len()
            && self
                .sequence
                .iter()
                .zip(bundle)
                .all(|(expected, instruction)| instruction.name == *expected)
    }

    fn delta(&self, bundle: &[ClassifiedInstruction]) -> LedgerDelta {
        let mut delta = LedgerDelta::new();
        if let Some(instruction) = bundle.get(self.receipt_position) {
            for address in instruction.addresses_with_role(self.receipt_role) {
                delta.add(address, self.change);
            }
        }
        delta
    }
}

impl Interpretation {
    pub fn unrecognized() -> Self {
        Self {
            event: ListingEvent::Unrecognized,
            delta: LedgerDelta::new(),
        }
    }
}

/// Interpret a bundle against [`KNOWN_SHAPES`]
pub fn interpret(bundle: &[ClassifiedInstruction]) -> Interpretation {
    interpret_with(KNOWN_SHAPES, bundle)
}

/// Interpret a bundle against an explicit shape list
pub fn interpret_with(shapes: &[BundleShape], bundle: &[ClassifiedInstruction]) -> Interpretation {
    match shapes.iter().find(|shape| shape.matches(bundle)) {
        Some(shape) => Interpretation {
            event: shape.event,
            delta: shape.delta(bundle),
        },
        None => {
            if !bundle.is_empty() {
                let names: Vec<&str> = bundle.iter().map(|ix| ix.name.as_str()).collect();
                debug!("Unrecognized bundle shape: {:?}", names);
            }
            Interpretation::unrecognized()
        }
    }
}
