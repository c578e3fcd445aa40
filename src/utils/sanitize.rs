//! Utilities for sanitizing upstream error bodies.
//!
//! Removes control characters and truncates oversized bodies before they are
//! carried inside an [`ApiError`](crate::ApiError) or written to the log.

/// Removes control characters (0x00-0x1F except tab, newline, carriage return).
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| {
            let code = *c as u32;
            code >= 0x20 || code == 0x09 || code == 0x0A || code == 0x0D
        })
        .collect()
}

/// Sanitizes and truncates an error body to `MAX_ERROR_BODY_LENGTH` characters.
///
/// Truncation happens on a character boundary and appends the original
/// length, so multi-byte bodies never panic.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message.trim());
    let max = crate::config::MAX_ERROR_BODY_LENGTH;
    let char_count = sanitized.chars().count();
    if char_count <= max {
        return sanitized;
    }
    // Leave room for the truncation note
    let keep = max.saturating_sub(50);
    let truncated: String = sanitized.chars().take(keep).collect();
    format!(
        "{}... (truncated, original length: {} chars)",
        truncated, char_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_control_characters() {
        assert_eq!(sanitize_error_message("bad\u{0}req\u{7}uest"), "badrequest");
        assert_eq!(sanitize_error_message("line1\nline2\ttab"), "line1\nline2\ttab");
    }

    #[test]
    fn test_short_message_is_untouched() {
        assert_eq!(
            sanitize_and_truncate_error_message("  Not Found  "),
            "Not Found"
        );
    }

    #[test]
    fn test_long_message_is_truncated_on_char_boundary() {
        let long = "é".repeat(5000);
        let result = sanitize_and_truncate_error_message(&long);
        assert!(result.contains("truncated, original length: 5000 chars"));
        assert!(result.chars().count() <= crate::config::MAX_ERROR_BODY_LENGTH + 10);
    }
}
