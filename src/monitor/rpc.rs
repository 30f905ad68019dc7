//! RPC client interactions for the auction-house program

use log::debug;
use serde_json::json;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_request::RpcRequest;
use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction_status::{EncodedConfirmedTransactionWithStatusMeta, UiTransactionEncoding};
use std::future::Future;
use std::str::FromStr;

use crate::errors::{ErrorContext, ErrorExt, SyncError, SyncResult};
use crate::models::transaction::SignatureInfo;

fn parse_signature(signature: &str) -> SyncResult<Signature> {
    Signature::from_str(signature)
        .map_err(|e| SyncError::Configuration(format!("Invalid signature '{}': {}", signature, e)))
}

/// Get every signature for `address` newer than `until`, most recent first.
pub async fn get_signatures_since(
    rpc_client: &RpcClient,
    address: &Pubkey,
    until: &str,
    page_limit: usize,
) -> SyncResult<Vec<SignatureInfo>> {
    let until = parse_signature(until)?;

    page_signatures(page_limit, |before| async move {
        let config = GetConfirmedSignaturesForAddress2Config {
            before,
            until: Some(until),
            limit: Some(page_limit),
            commitment: Some(CommitmentConfig::confirmed()),
        };
        let page = rpc_client
            .get_signatures_for_address_with_config(address, config)
            .await
            .rpc_context(ErrorContext::new("monitor", "get_signatures_for_address"))?;
        debug!("Fetched page of {} signature(s) for {}", page.len(), address);

        Ok(page
            .into_iter()
            .map(|status| SignatureInfo {
                signature: status.signature,
                slot: status.slot,
                failed: status.err.is_some(),
            })
            .collect())
    })
    .await
}

/// Collect pages from `fetch`, newest first.
///
/// Each call gets the oldest signature seen so far as `before`. Paging stops
/// at the first page shorter than `page_limit`, so a backlog larger than one
/// page is fetched in full.
pub async fn page_signatures<F, Fut>(page_limit: usize, mut fetch: F) -> SyncResult<Vec<SignatureInfo>>
where
    F: FnMut(Option<Signature>) -> Fut,
    Fut: Future<Output = SyncResult<Vec<SignatureInfo>>>,
{
    let mut signatures: Vec<SignatureInfo> = Vec::new();
    let mut before: Option<Signature> = None;

    loop {
        let page = fetch(before).await?;
        let page_len = page.len();
        signatures.extend(page);

        if page_len < page_limit {
            break;
        }
        match signatures.last() {
            Some(last) => before = Some(parse_signature(&last.signature)?),
            None => break,
        }
    }

    Ok(signatures)
}

/// Get a confirmed transaction with its instructions in raw JSON form.
///
/// Returns `None` when the node answers with a null result, which it does
/// for signatures it has listed but not yet made available. A body that does
/// not decode stays an RPC error.
pub async fn get_transaction(
    rpc_client: &RpcClient,
    signature: &str,
) -> SyncResult<Option<EncodedConfirmedTransactionWithStatusMeta>> {
    let parsed = parse_signature(signature)?;
    let config = RpcTransactionConfig {
        encoding: Some(UiTransactionEncoding::Json),
        commitment: Some(CommitmentConfig::confirmed()),
        max_supported_transaction_version: Some(0),
    };

    let transaction = rpc_client
        .send::<Option<EncodedConfirmedTransactionWithStatusMeta>>(
            RpcRequest::GetTransaction,
            json!([parsed.to_string(), config]),
        )
        .await
        .rpc_context(ErrorContext::new("monitor", "get_transaction").with_signature(signature))?;

    if transaction.is_none() {
        debug!("No transaction body for {} yet", signature);
    }
    Ok(transaction)
}
