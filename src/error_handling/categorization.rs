//! Response categorization and retry strategy.
//!
//! This module maps upstream HTTP statuses to retry classes, builds the
//! exponential backoff schedule, and interprets `Retry-After` headers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{RetryPolicy, HTTP_STATUS_TOO_MANY_REQUESTS, RETRY_FACTOR};

/// How the executor should treat an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx: parse the body.
    Success,
    /// 429: retry, honoring `Retry-After`.
    RateLimited,
    /// 5xx: retry with backoff.
    ServerError,
    /// Everything else: fail immediately.
    ClientError,
}

/// Categorizes an HTTP status code.
///
/// Redirects are not followed by the transport, so 1xx/3xx land in
/// `ClientError` together with the non-429 4xx codes: none of them becomes
/// valid by asking again.
pub fn classify_status(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        HTTP_STATUS_TOO_MANY_REQUESTS => ResponseClass::RateLimited,
        500..=599 => ResponseClass::ServerError,
        _ => ResponseClass::ClientError,
    }
}

/// Creates the exponential backoff schedule for a retry policy.
///
/// The n-th element (zero based) is `initial_delay × 2^n`, capped at
/// `max_delay`. The initial delay is rounded down to a multiple of the growth
/// factor.
pub fn backoff_schedule(policy: &RetryPolicy) -> impl Iterator<Item = Duration> {
    let initial_ms = u64::try_from(policy.initial_delay.as_millis()).unwrap_or(u64::MAX);
    let unit_ms = (initial_ms / RETRY_FACTOR).max(1);
    ExponentialBackoff::from_millis(RETRY_FACTOR)
        .factor(unit_ms)
        .max_delay(policy.max_delay)
}

/// Backoff delay to wait after the given failed attempt (zero based).
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    backoff_schedule(policy)
        .nth(attempt as usize)
        .unwrap_or(policy.max_delay)
}

/// Parses a `Retry-After` header value into a wait duration.
///
/// Accepts delta-seconds (`"2"`, `"1.5"`) and HTTP-dates. Dates in the past
/// yield a zero wait. Anything else, including values too large for a
/// `Duration`, yields `None`, letting the caller fall back to backoff.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    if let Ok(secs) = value.parse::<f64>() {
        // Negative, non-finite or overflowing values fall back to backoff
        return Duration::try_from_secs_f64(secs).ok();
    }
    let when = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = when.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(200), ResponseClass::Success);
        assert_eq!(classify_status(201), ResponseClass::Success);
        assert_eq!(classify_status(204), ResponseClass::Success);
        assert_eq!(classify_status(429), ResponseClass::RateLimited);
        assert_eq!(classify_status(500), ResponseClass::ServerError);
        assert_eq!(classify_status(503), ResponseClass::ServerError);
        assert_eq!(classify_status(400), ResponseClass::ClientError);
        assert_eq!(classify_status(401), ResponseClass::ClientError);
        assert_eq!(classify_status(404), ResponseClass::ClientError);
        assert_eq!(classify_status(302), ResponseClass::ClientError);
    }

    #[test]
    fn test_backoff_schedule_doubles_from_one_second() {
        let policy = RetryPolicy::default();
        let delays: Vec<Duration> = backoff_schedule(&policy).take(4).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
                Duration::from_millis(8000),
            ]
        );
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(backoff_delay(&policy, 4), Duration::from_millis(16_000));
        assert_eq!(backoff_delay(&policy, 5), Duration::from_secs(30));
        assert_eq!(backoff_delay(&policy, 20), Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_with_short_policy() {
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(25),
            ..Default::default()
        };
        assert_eq!(backoff_delay(&policy, 0), Duration::from_millis(10));
        assert_eq!(backoff_delay(&policy, 1), Duration::from_millis(20));
        assert_eq!(backoff_delay(&policy, 2), Duration::from_millis(25));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let now = Utc::now();
        assert_eq!(parse_retry_after("2", now), Some(Duration::from_secs(2)));
        assert_eq!(parse_retry_after(" 10 ", now), Some(Duration::from_secs(10)));
        assert_eq!(
            parse_retry_after("1.5", now),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_parse_retry_after_http_date() {
        let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 27, 55).unwrap();
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", now),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_parse_retry_after_past_date_is_zero() {
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", now),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_parse_retry_after_garbage() {
        let now = Utc::now();
        assert_eq!(parse_retry_after("", now), None);
        assert_eq!(parse_retry_after("soon", now), None);
        assert_eq!(parse_retry_after("-3", now), None);
        assert_eq!(parse_retry_after("inf", now), None);
    }

    #[test]
    fn test_parse_retry_after_out_of_range_is_none() {
        let now = Utc::now();
        assert_eq!(parse_retry_after("1e30", now), None);
        assert_eq!(parse_retry_after("1e300", now), None);
    }
}
