use chrono::Utc;

/// Get current Unix timestamp in milliseconds (UTC)
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}
