//! Constants used throughout the sync

pub mod anchor;

/// Auction-house program that owns the instructions we decode
pub const AUCTION_HOUSE_PROGRAM_ID: &str = "hausS13jsjafwWwGqZTUQRmWyvyxn9EQpqMwV1PBBmk";

/// Default RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Largest page `getSignaturesForAddress` will return
pub const MAX_SIGNATURE_PAGE: usize = 1000;

/// Store keys
pub mod store {
    /// Tree holding one key per active listing receipt
    pub const LISTINGS_TREE: &str = "activeListings";
    /// Tree holding scalar sync state
    pub const META_TREE: &str = "settings";
    /// Key of the sync cursor inside the meta tree
    pub const CURSOR_KEY: &str = "lastSignature";
}
