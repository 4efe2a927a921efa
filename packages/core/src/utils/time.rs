// Время

use chrono::Utc;

/// Unix timestamp в миллисекундах
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}
