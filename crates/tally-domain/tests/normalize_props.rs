//! Property tests for candidate enrichment

use proptest::prelude::*;
use tally_domain::{normalize, RecordStatus, TransactionCandidate};

fn candidate_strategy() -> impl Strategy<Value = TransactionCandidate> {
    (
        "[0-9]{2}-[A-Z][a-z]{2}-[0-9]{4}",
        ".{0,24}",
        0.0f64..1_000_000.0,
        prop_oneof![Just("credit".to_string()), Just("debit".to_string()), ".{0,8}"],
        ".{0,16}",
        ".{0,16}",
    )
        .prop_map(|(date_time, vendor, amount, kind, category, source)| TransactionCandidate {
            date_time,
            vendor,
            amount,
            kind,
            category,
            source,
        })
}

proptest! {
    #[test]
    fn enrichment_sets_account_and_status(candidate in candidate_strategy(), file_id in "[a-z0-9_]{1,16}\\.pdf") {
        let transactions = normalize(vec![candidate.clone()], &file_id);

        prop_assert_eq!(transactions.len(), 1);
        prop_assert_eq!(&transactions[0].account, &file_id);
        prop_assert_eq!(transactions[0].status, RecordStatus::Ok);
        prop_assert_eq!(&transactions[0].candidate, &candidate);
    }

    #[test]
    fn enrichment_is_total(candidates in prop::collection::vec(candidate_strategy(), 0..20), file_id in ".{0,12}") {
        let transactions = normalize(candidates.clone(), &file_id);

        prop_assert_eq!(transactions.len(), candidates.len());
        for (transaction, candidate) in transactions.iter().zip(candidates.iter()) {
            prop_assert_eq!(&transaction.account, &file_id);
            prop_assert_eq!(&transaction.candidate, candidate);
        }
    }
}
