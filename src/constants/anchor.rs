//! Anchor-specific constants

/// Namespace prefixed to instruction names before hashing
pub const INSTRUCTION_NAMESPACE: &str = "global";

/// Length of an Anchor instruction discriminator
pub const DISCRIMINATOR_LEN: usize = 8;

/// Sentinel name for instructions whose tag is not in the table
pub const UNKNOWN_INSTRUCTION: &str = "unknown";

/// Auction-house instruction names, in snake_case form
pub mod instructions {
    pub const SELL: &str = "sell";
    pub const PRINT_LISTING_RECEIPT: &str = "print_listing_receipt";
    pub const CANCEL: &str = "cancel";
    pub const CANCEL_LISTING_RECEIPT: &str = "cancel_listing_receipt";
    pub const BUY: &str = "buy";
    pub const PRINT_BID_RECEIPT: &str = "print_bid_receipt";
    pub const EXECUTE_SALE: &str = "execute_sale";
    pub const PRINT_PURCHASE_RECEIPT: &str = "print_purchase_receipt";
}

/// Account role names as declared in the IDL
pub mod roles {
    pub const RECEIPT: &str = "receipt";
    pub const LISTING_RECEIPT: &str = "listingReceipt";
}
