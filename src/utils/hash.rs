//! Hashing utilities

use sha2::{Sha256, Digest};
use crate::constants::anchor::{DISCRIMINATOR_LEN, INSTRUCTION_NAMESPACE};

/// Generate an Anchor instruction discriminator from a snake_case name
pub fn generate_anchor_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let namespace = format!("{}:{}", INSTRUCTION_NAMESPACE, name);
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    let hash = hasher.finalize();

    let mut result = [0u8; DISCRIMINATOR_LEN];
    result.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    result
}

/// Lowercase hex rendering of a discriminator, for logs
pub fn discriminator_hex(tag: &[u8]) -> String {
    tag.iter().map(|b| format!("{:02x}", b)).collect()
}
