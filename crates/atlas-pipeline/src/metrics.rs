//! Documentation metrics per record.

use atlas_core::models::{DocumentMetrics, ServerRecord};

const WORD_COUNT_SCALE: f64 = 1_000.0;
const LENGTH_SCALE: f64 = 10_000.0;

pub fn compute_metrics(record: &ServerRecord) -> DocumentMetrics {
    let detailed = &record.detailed_content;
    let word_count = detailed.split_whitespace().count();
    let documentation_length = detailed.chars().count();
    let feature_count = detailed.matches("\n-").count() + detailed.matches("\n•").count();
    let tool_count = detailed.to_lowercase().matches("tool").count();
    let has_github = record.github_url.as_deref().is_some_and(|u| !u.is_empty());
    let content = record.content.to_lowercase();
    let has_faq = content.contains("faq") || content.contains("frequently asked");

    DocumentMetrics {
        word_count,
        documentation_length,
        feature_count,
        tool_count,
        has_github,
        has_faq,
        feature_vector: vec![
            word_count as f64 / WORD_COUNT_SCALE,
            documentation_length as f64 / LENGTH_SCALE,
            feature_count as f64,
            tool_count as f64,
            if has_github { 1.0 } else { 0.0 },
            if has_faq { 1.0 } else { 0.0 },
        ],
    }
}

/// Attach metrics to every record.
pub fn calculate_metrics(records: Vec<ServerRecord>) -> Vec<ServerRecord> {
    records
        .into_iter()
        .map(|record| {
            let metrics = compute_metrics(&record);
            record.with_metrics(metrics)
        })
        .collect()
}
