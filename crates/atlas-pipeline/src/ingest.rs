//! Catalog ingestion: JSON loading and basic processing.

use std::collections::HashSet;
use std::path::Path;

use atlas_core::errors::IngestError;
use atlas_core::models::{RawServer, ServerRecord};
use tracing::{info, warn};

/// Read a JSON array of catalog entries. Unknown fields are ignored.
pub fn load_catalog(path: &Path) -> Result<Vec<RawServer>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, &path.display().to_string())
}

/// Parse catalog JSON; `label` names the source in errors.
pub fn parse_catalog(json: &str, label: &str) -> Result<Vec<RawServer>, IngestError> {
    let servers: Vec<RawServer> = serde_json::from_str(json).map_err(|e| IngestError::Parse {
        path: label.to_string(),
        reason: e.to_string(),
    })?;
    info!(source = label, count = servers.len(), "catalog loaded");
    Ok(servers)
}

/// Validate one raw entry. `index` is its position in the catalog.
pub fn to_record(index: usize, raw: RawServer) -> Result<ServerRecord, IngestError> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(IngestError::MissingField { index, field: "id" });
    }
    let title = raw.title.trim().to_string();
    if title.is_empty() {
        return Err(IngestError::MissingField {
            index,
            field: "title",
        });
    }
    Ok(ServerRecord {
        id,
        title,
        description: raw.description.trim().to_string(),
        tags: raw
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        author: raw.author,
        github_url: raw.github_url.filter(|u| !u.trim().is_empty()),
        content: raw.content,
        detailed_content: raw.detailed_content,
        ..Default::default()
    })
}

/// Convert raw entries into records. Invalid entries are skipped with a
/// warning; for duplicate ids the first entry wins.
pub fn basic_processing(raw: Vec<RawServer>) -> Vec<ServerRecord> {
    let total = raw.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut records = Vec::with_capacity(total);
    for (index, entry) in raw.into_iter().enumerate() {
        match to_record(index, entry) {
            Ok(record) => {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                } else {
                    warn!(index, server_id = %record.id, "duplicate server id, keeping first");
                }
            }
            Err(e) => warn!(index, error = %e, "skipping catalog entry"),
        }
    }
    info!(total, kept = records.len(), "basic processing complete");
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_reported() {
        let raw = RawServer {
            id: "x".into(),
            ..Default::default()
        };
        assert!(matches!(
            to_record(4, raw),
            Err(IngestError::MissingField { index: 4, field: "title" })
        ));
    }

    #[test]
    fn parse_ignores_unknown_fields() {
        let servers = parse_catalog(r#"[{"id":"a","title":"T","stars":5}]"#, "inline").unwrap();
        assert_eq!(servers[0].id, "a");
        assert!(servers[0].tags.is_empty());
    }

    #[test]
    fn parse_error_names_source() {
        let err = parse_catalog("{", "inline").unwrap_err();
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn blank_github_url_is_dropped() {
        let raw = RawServer {
            id: "a".into(),
            title: "T".into(),
            github_url: Some("  ".into()),
            tags: vec![" rust ".into(), "".into()],
            ..Default::default()
        };
        let record = to_record(0, raw).unwrap();
        assert_eq!(record.github_url, None);
        assert_eq!(record.tags, vec!["rust"]);
    }
}
