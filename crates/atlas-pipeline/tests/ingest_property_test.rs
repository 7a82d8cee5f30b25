//! Property tests for basic processing and metrics.

use std::collections::HashSet;

use atlas_core::models::RawServer;
use atlas_pipeline::ingest::basic_processing;
use atlas_pipeline::metrics::{calculate_metrics, compute_metrics};
use proptest::prelude::*;

fn raw_server() -> impl Strategy<Value = RawServer> {
    (
        prop_oneof![Just(String::new()), "[a-e]{1,2}"],
        prop_oneof![Just(String::new()), "[A-Za-z ]{1,20}"],
        "[a-z \n\\-]{0,60}",
    )
        .prop_map(|(id, title, detailed_content)| RawServer {
            id,
            title,
            detailed_content,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn processed_ids_are_unique_and_non_empty(raw in prop::collection::vec(raw_server(), 0..30)) {
        let records = basic_processing(raw.clone());
        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(ids.len(), records.len());
        prop_assert!(records.iter().all(|r| !r.id.is_empty() && !r.title.is_empty()));
        prop_assert!(records.len() <= raw.len());
    }

    #[test]
    fn metrics_match_detailed_content(raw in prop::collection::vec(raw_server(), 0..20)) {
        let records = calculate_metrics(basic_processing(raw));
        for record in &records {
            let m = &record.metrics;
            prop_assert_eq!(m.word_count, record.detailed_content.split_whitespace().count());
            prop_assert_eq!(m.feature_vector.len(), 6);
            prop_assert_eq!(m.feature_vector[2], m.feature_count as f64);
            prop_assert_eq!(&compute_metrics(record), m);
        }
    }
}
