use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the UNIX epoch, used to name captured frames
pub fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
