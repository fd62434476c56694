//! Small helpers shared by the config and storage layers.

/// Trimmed text, or `None` when missing or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Wall clock in Unix milliseconds. Stamps remote records and kv rows.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
