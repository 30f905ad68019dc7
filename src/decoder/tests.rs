//! Tests for the decoder module

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::constants::AUCTION_HOUSE_PROGRAM_ID;
    use crate::errors::SyncError;
    use crate::models::idl::OperationDeclaration;
    use crate::models::instruction::{AccountWithRole, RawInstruction};
    use crate::utils::hash::generate_anchor_discriminator;

    fn data_for(name: &str, args: &[u8]) -> String {
        let mut bytes = generate_anchor_discriminator(name).to_vec();
        bytes.extend_from_slice(args);
        bs58::encode(bytes).into_string()
    }

    fn addresses(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    fn builtin_classifier() -> Classifier {
        Classifier::new(Arc::new(DiscriminatorTable::builtin().unwrap()))
    }

    fn classified(name: &str, accounts: &[(&str, &str)]) -> ClassifiedInstruction {
        ClassifiedInstruction {
            name: name.to_string(),
            accounts: accounts
                .iter()
                .map(|(role, address)| AccountWithRole {
                    role: role.to_string(),
                    address: address.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_builtin_table() {
        let table = DiscriminatorTable::builtin().unwrap();
        assert_eq!(table.len(), 15);

        let sell = table.lookup(&generate_anchor_discriminator("sell")).unwrap();
        assert_eq!(sell.name, "sell");
        assert_eq!(sell.roles[0], "wallet");

        let receipt = table.lookup(&generate_anchor_discriminator("print_purchase_receipt")).unwrap();
        assert_eq!(receipt.roles[1], "listingReceipt");
    }

    #[test]
    fn test_names_normalise_to_same_tag() {
        let upper = DiscriminatorTable::build(&[OperationDeclaration::new("Sell", &["wallet"])]).unwrap();
        let lower = DiscriminatorTable::build(&[OperationDeclaration::new("sell", &["wallet"])]).unwrap();

        assert_eq!(upper.tag_for("sell"), lower.tag_for("sell"));
        assert_eq!(upper.tag_for("sell"), Some(generate_anchor_discriminator("sell")));
    }

    #[test]
    fn test_case_collision_is_schema_error() {
        let result = DiscriminatorTable::build(&[
            OperationDeclaration::new("Sell", &["wallet"]),
            OperationDeclaration::new("sell", &["wallet"]),
        ]);
        assert!(matches!(result, Err(SyncError::Schema(_))));
    }

    #[test]
    fn test_malformed_declarations() {
        let unnamed = DiscriminatorTable::build(&[OperationDeclaration::new("  ", &["wallet"])]);
        assert!(matches!(unnamed, Err(SyncError::Schema(_))));

        let no_accounts = DiscriminatorTable::build(&[OperationDeclaration::new("sell", &[])]);
        assert!(matches!(no_accounts, Err(SyncError::Schema(_))));

        let bad_json = DiscriminatorTable::from_idl_json("{\"instructions\": 3}");
        assert!(matches!(bad_json, Err(SyncError::Schema(_))));
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut table = DiscriminatorTable::build(&[OperationDeclaration::new("sell", &["wallet"])]).unwrap();
        table.rebuild(&[OperationDeclaration::new("buy", &["wallet"])]).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.tag_for("sell").is_none());
        assert!(table.tag_for("buy").is_some());

        // A failed rebuild keeps what was there
        let result = table.rebuild(&[OperationDeclaration::new("cancel", &[])]);
        assert!(result.is_err());
        assert!(table.tag_for("buy").is_some());
    }

    #[test]
    fn test_nested_account_groups_flatten_in_order() {
        let json = r#"{
            "instructions": [{
                "name": "executeSale",
                "accounts": [
                    {"name": "buyer", "isMut": true, "isSigner": false},
                    {"name": "trade", "accounts": [
                        {"name": "buyerTradeState", "isMut": true, "isSigner": false},
                        {"name": "sellerTradeState", "isMut": true, "isSigner": false}
                    ]},
                    {"name": "rent", "isMut": false, "isSigner": false}
                ]
            }]
        }"#;
        let table = DiscriminatorTable::from_idl_json(json).unwrap();
        let schema = table.lookup(&generate_anchor_discriminator("execute_sale")).unwrap();
        assert_eq!(schema.roles, vec!["buyer", "buyerTradeState", "sellerTradeState", "rent"]);
    }

    #[test]
    fn test_classify_truncates_to_shorter_list() {
        let classifier = builtin_classifier();

        // print_listing_receipt declares five roles, give it three accounts
        let accounts = addresses(&["R1", "BOOK", "SYS"]);
        let result = classifier.classify(&data_for("print_listing_receipt", &[254]), &accounts);

        assert_eq!(result.name, "print_listing_receipt");
        assert_eq!(result.accounts.len(), 3);
        assert_eq!(result.accounts[0], AccountWithRole { role: "receipt".to_string(), address: "R1".to_string() });
        assert_eq!(result.accounts[1].role, "bookkeeper");
        assert_eq!(result.accounts[2].address, "SYS");

        // More accounts than roles keeps only the declared positions
        let accounts = addresses(&["R1", "SYS", "IX", "EXTRA1", "EXTRA2"]);
        let result = classifier.classify(&data_for("cancel_listing_receipt", &[]), &accounts);
        assert_eq!(result.accounts.len(), 3);
        assert_eq!(result.accounts[2].role, "instruction");
    }

    #[test]
    fn test_classify_unknown_inputs() {
        let classifier = builtin_classifier();
        let accounts = addresses(&["A", "B"]);

        let unknown_tag = classifier.classify(&bs58::encode([1u8, 2, 3, 4, 5, 6, 7, 8, 9]).into_string(), &accounts);
        assert_eq!(unknown_tag, ClassifiedInstruction::unknown());
        assert!(unknown_tag.is_unknown());

        let short = classifier.classify(&bs58::encode([1u8, 2, 3]).into_string(), &accounts);
        assert!(short.is_unknown());

        let not_base58 = classifier.classify("0OIl not base58", &accounts);
        assert!(not_base58.is_unknown());
        assert!(not_base58.accounts.is_empty());

        let empty = classifier.classify("", &[]);
        assert!(empty.is_unknown());
    }

    #[test]
    fn test_bind_roles_is_positional() {
        let roles = addresses(&["receipt", "bookkeeper"]);
        let bound = bind_roles(&roles, &addresses(&["X"]));
        assert_eq!(bound, vec![AccountWithRole { role: "receipt".to_string(), address: "X".to_string() }]);
        assert!(bind_roles(&roles, &[]).is_empty());
    }

    #[test]
    fn test_interpret_listing() {
        let bundle = vec![
            classified("sell", &[("wallet", "W")]),
            classified("print_listing_receipt", &[("receipt", "R1"), ("bookkeeper", "B")]),
        ];
        let result = interpret(&bundle);
        assert_eq!(result.event, ListingEvent::Listing);
        assert_eq!(result.delta.get("R1"), Some(1));
        assert_eq!(result.delta.len(), 1);
    }

    #[test]
    fn test_interpret_cancellation() {
        let bundle = vec![
            classified("cancel", &[("wallet", "W")]),
            classified("cancel_listing_receipt", &[("receipt", "R1")]),
        ];
        let result = interpret(&bundle);
        assert_eq!(result.event, ListingEvent::Cancellation);
        assert_eq!(result.delta.get("R1"), Some(-1));
    }

    #[test]
    fn test_interpret_sale() {
        let bundle = vec![
            classified("buy", &[("wallet", "W")]),
            classified("print_bid_receipt", &[("receipt", "BID")]),
            classified("execute_sale", &[("buyer", "W")]),
            classified("print_purchase_receipt", &[
                ("purchaseReceipt", "P"),
                ("listingReceipt", "R2"),
                ("bidReceipt", "BID"),
            ]),
        ];
        let result = interpret(&bundle);
        assert_eq!(result.event, ListingEvent::Sale);
        assert_eq!(result.delta.get("R2"), Some(-1));
        assert_eq!(result.delta.get("BID"), None);
        assert_eq!(result.delta.len(), 1);
    }

    #[test]
    fn test_interpret_is_positional_and_exact() {
        // Reordered instructions do not match
        let swapped = vec![
            classified("print_listing_receipt", &[("receipt", "R1")]),
            classified("sell", &[("wallet", "W")]),
        ];
        assert_eq!(interpret(&swapped).event, ListingEvent::Unrecognized);

        // A truncated sale does not match
        let short = vec![
            classified("buy", &[]),
            classified("print_bid_receipt", &[]),
            classified("execute_sale", &[]),
        ];
        assert_eq!(interpret(&short).event, ListingEvent::Unrecognized);

        // Only the first instruction alone is not a listing
        let lone = vec![classified("sell", &[])];
        assert_eq!(interpret(&lone).event, ListingEvent::Unrecognized);

        // Trailing instructions after a full shape are fine
        let trailing = vec![
            classified("sell", &[]),
            classified("print_listing_receipt", &[("receipt", "R1")]),
            classified("unknown", &[]),
        ];
        assert_eq!(interpret(&trailing).event, ListingEvent::Listing);

        assert_eq!(interpret(&[]), Interpretation::unrecognized());
    }

    #[test]
    fn test_every_receipt_account_contributes() {
        let bundle = vec![
            classified("sell", &[]),
            classified("print_listing_receipt", &[("receipt", "R1"), ("receipt", "R3")]),
        ];
        let result = interpret(&bundle);
        assert_eq!(result.delta.get("R1"), Some(1));
        assert_eq!(result.delta.get("R3"), Some(1));
    }

    #[test]
    fn test_decoder_filters_program_and_failures() {
        let decoder = Decoder::new(Arc::new(DiscriminatorTable::builtin().unwrap()), AUCTION_HOUSE_PROGRAM_ID);
        let mut transaction = LedgerTransaction {
            signature: "sig".to_string(),
            slot: 1,
            failed: false,
            instructions: vec![
                RawInstruction::new("ComputeBudget111111111111111111111111111111", &data_for("sell", &[]), &["X"]),
                RawInstruction::new(AUCTION_HOUSE_PROGRAM_ID, &data_for("sell", &[]), &["W"]),
                RawInstruction::new("11111111111111111111111111111111", "3Bxs4h24hBtQy9rw", &["W", "R9"]),
                RawInstruction::new(AUCTION_HOUSE_PROGRAM_ID, &data_for("print_listing_receipt", &[255]), &["R1", "W"]),
            ],
        };

        let bundle = decoder.bundle(&transaction);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle[0].name, "sell");

        let result = decoder.interpret(&transaction);
        assert_eq!(result.event, ListingEvent::Listing);
        assert_eq!(result.delta.get("R1"), Some(1));

        transaction.failed = true;
        assert_eq!(decoder.interpret(&transaction), Interpretation::unrecognized());
    }
}
