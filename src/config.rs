//! Runtime configuration
//!
//! Values come from defaults, then an optional JSON file, then `AH_SYNC_*`
//! environment variables. The binary applies command-line flags last.

use log::debug;
use serde::{Serialize, Deserialize};
use solana_pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{AUCTION_HOUSE_PROGRAM_ID, DEFAULT_RPC_URL, MAX_SIGNATURE_PAGE};
use crate::errors::{SyncError, SyncResult};

/// Configuration as read from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Auction-house account whose signatures are scanned
    pub auction_house: Option<String>,
    /// Program whose instructions are decoded
    pub program_id: String,
    /// Starting point when no cursor has been committed
    pub genesis_signature: Option<String>,
    /// Sled database directory
    pub db_path: PathBuf,
    /// IDL file; the embedded auction-house IDL is used when absent
    pub idl_path: Option<PathBuf>,
    /// Seconds between cycles in watch mode
    pub interval_secs: u64,
    /// Hard limit on one cycle in watch mode
    pub cycle_timeout_secs: u64,
    /// Signatures per RPC page
    pub page_limit: usize,
    /// Listen address of the read-through API
    pub http_addr: String,
}

/// Configuration after validation, with addresses parsed
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub rpc_url: String,
    pub auction_house: Pubkey,
    pub program_id: Pubkey,
    pub genesis_signature: Option<String>,
    pub page_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            auction_house: None,
            program_id: AUCTION_HOUSE_PROGRAM_ID.to_string(),
            genesis_signature: None,
            db_path: default_db_path(),
            idl_path: None,
            interval_secs: 300,
            cycle_timeout_secs: 270,
            page_limit: MAX_SIGNATURE_PAGE,
            http_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// `~/.solana/auction_house_sync`, or a relative directory without a home
fn default_db_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".solana").join("auction_house_sync")
}

impl SyncConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> SyncResult<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| {
            SyncError::Configuration(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Defaults, then the file if given, then the process environment
    pub fn load(path: Option<&Path>) -> SyncResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from `AH_SYNC_*` variables looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AH_SYNC_RPC_URL") {
            self.rpc_url = v;
        }
        if let Some(v) = lookup("AH_SYNC_AUCTION_HOUSE") {
            self.auction_house = Some(v);
        }
        if let Some(v) = lookup("AH_SYNC_PROGRAM_ID") {
            self.program_id = v;
        }
        if let Some(v) = lookup("AH_SYNC_GENESIS_SIGNATURE") {
            self.genesis_signature = Some(v);
        }
        if let Some(v) = lookup("AH_SYNC_DB_PATH") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("AH_SYNC_IDL_PATH") {
            self.idl_path = Some(PathBuf::from(v));
        }
        debug!("Configuration after environment: {:?}", self);
    }

    /// Check required values and parse addresses
    pub fn validate(&self) -> SyncResult<ValidatedConfig> {
        let auction_house = match self.auction_house.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => parse_address("auction_house", address)?,
            _ => {
                return Err(SyncError::Configuration(
                    "auction_house address is required".to_string(),
                ))
            }
        };
        if self.program_id.trim().is_empty() {
            return Err(SyncError::Configuration("program_id is required".to_string()));
        }
        let program_id = parse_address("program_id", self.program_id.trim())?;

        if self.page_limit == 0 || self.page_limit > MAX_SIGNATURE_PAGE {
            return Err(SyncError::Configuration(format!(
                "page_limit must be between 1 and {}, got {}",
                MAX_SIGNATURE_PAGE, self.page_limit
            )));
        }

        let genesis_signature = self
            .genesis_signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ValidatedConfig {
            rpc_url: self.rpc_url.clone(),
            auction_house,
            program_id,
            genesis_signature,
            page_limit: self.page_limit,
        })
    }
}

fn parse_address(field: &str, value: &str) -> SyncResult<Pubkey> {
    Pubkey::from_str(value)
        .map_err(|e| SyncError::Configuration(format!("Invalid {} '{}': {}", field, value, e)))
}
