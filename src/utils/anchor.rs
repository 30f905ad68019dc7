//! Anchor naming helpers

/// Convert an IDL instruction name to the snake_case form Anchor hashes.
///
/// An underscore goes between a lowercase ASCII letter and a following
/// uppercase ASCII letter, then everything is lowercased. Runs of capitals
/// are not split, so `executeSale` and `ExecuteSale` both become
/// `execute_sale` while `printNFTReceipt` becomes `print_nftreceipt`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = prev {
            if p.is_ascii_lowercase() && c.is_ascii_uppercase() {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }
    out
}
