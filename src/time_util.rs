use chrono::{TimeZone, Utc};

/// 当前 UTC 毫秒时间戳
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 毫秒时间戳格式化为 UTC 时间字符串
pub fn mill_time_to_datetime(timestamp_ms: i64) -> Result<String, String> {
    match Utc.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(datetime) => Ok(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
        chrono::LocalResult::None => Err(format!("Invalid timestamp: {}", timestamp_ms)),
        chrono::LocalResult::Ambiguous(_, _) => Err(format!("Ambiguous timestamp: {}", timestamp_ms)),
    }
}
