//! Per-call trace identifiers and timing helpers.

use std::time::Duration;

/// Generates a trace identifier for one logical API call.
///
/// Format: `api-<unix millis>-<6 hex digits>`. Unique enough to correlate the
/// log lines of concurrent calls; not a security token.
pub fn new_trace_id() -> String {
    format!(
        "api-{}-{:06x}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u32>() & 0x00FF_FFFF
    )
}

/// Converts a duration to whole milliseconds, saturating.
pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_shape() {
        let id = new_trace_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "api");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert!(u32::from_str_radix(parts[2], 16).is_ok());
    }

    #[test]
    fn test_duration_to_ms() {
        assert_eq!(duration_to_ms(Duration::from_micros(1500)), 1);
        assert_eq!(duration_to_ms(Duration::from_secs(2)), 2000);
        assert_eq!(duration_to_ms(Duration::MAX), u64::MAX);
    }
}
