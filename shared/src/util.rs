/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a UUID v4 string for use as resource ID.
///
/// Used by both pos-server and pos-client (for optimistic placeholder IDs).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
