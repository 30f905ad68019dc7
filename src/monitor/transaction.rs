//! Conversion of RPC transaction bodies into ledger transactions

use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiLoadedAddresses, UiMessage,
    UiRawMessage,
};

use crate::errors::{SyncError, SyncResult};
use crate::models::instruction::RawInstruction;
use crate::models::transaction::LedgerTransaction;

/// Convert a `getTransaction` response fetched with JSON encoding
pub fn from_encoded(
    signature: &str,
    encoded: EncodedConfirmedTransactionWithStatusMeta,
) -> SyncResult<LedgerTransaction> {
    let slot = encoded.slot;
    let meta = encoded.transaction.meta;
    let failed = meta.as_ref().map(|m| m.err.is_some()).unwrap_or(false);

    let message = match encoded.transaction.transaction {
        EncodedTransaction::Json(ui) => match ui.message {
            UiMessage::Raw(raw) => raw,
            UiMessage::Parsed(_) => {
                return Err(malformed(signature, "expected a raw message, got a parsed one"));
            }
        },
        _ => return Err(malformed(signature, "expected JSON transaction encoding")),
    };

    let loaded = meta.as_ref().and_then(|m| match &m.loaded_addresses {
        OptionSerializer::Some(loaded) => Some(loaded),
        _ => None,
    });

    let instructions = resolve_instructions(&message, loaded)
        .map_err(|reason| malformed(signature, &reason))?;

    Ok(LedgerTransaction {
        signature: signature.to_string(),
        slot,
        failed,
        instructions,
    })
}

/// Resolve top-level instructions against the full account key list.
///
/// Indexes address the static keys first, then lookup-table addresses loaded
/// as writable, then those loaded as readonly.
pub fn resolve_instructions(
    message: &UiRawMessage,
    loaded: Option<&UiLoadedAddresses>,
) -> Result<Vec<RawInstruction>, String> {
    let mut keys: Vec<&str> = message.account_keys.iter().map(String::as_str).collect();
    if let Some(loaded) = loaded {
        keys.extend(loaded.writable.iter().map(String::as_str));
        keys.extend(loaded.readonly.iter().map(String::as_str));
    }

    let key_at = |index: usize| -> Result<String, String> {
        keys.get(index)
            .map(|k| k.to_string())
            .ok_or_else(|| format!("account index {} out of range ({} keys)", index, keys.len()))
    };

    message
        .instructions
        .iter()
        .map(|ix| {
            Ok(RawInstruction {
                program_id: key_at(ix.program_id_index as usize)?,
                data: ix.data.clone(),
                accounts: ix
                    .accounts
                    .iter()
                    .map(|i| key_at(*i as usize))
                    .collect::<Result<Vec<_>, _>>()?,
            })
        })
        .collect()
}

fn malformed(signature: &str, reason: &str) -> SyncError {
    SyncError::Rpc(format!("Malformed transaction {}: {}", signature, reason))
}
