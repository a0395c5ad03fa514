use repolens_core::types::RepositoryMetrics;

/// Format the corpus metrics as a JSON array.
pub fn format_report(records: &[RepositoryMetrics], compact: bool) -> String {
    if compact {
        serde_json::to_string(records).expect("RepositoryMetrics should be serializable")
    } else {
        serde_json::to_string_pretty(records).expect("RepositoryMetrics should be serializable")
    }
}
