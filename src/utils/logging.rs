//! Logging utilities
//!
//! Subscriber setup and helpers for keeping logged payloads short

use crate::config::LoggingConfig;

/// Default number of body bytes kept in debug logs
pub const LOG_BODY_LIMIT: usize = 500;

/// Render a response or request body for logging, truncated with a note
/// about the original length
pub fn truncate_body(body: &[u8], max_len: usize) -> String {
    let text = String::from_utf8_lossy(body);
    truncate_content(&text, max_len)
}

/// Truncate a string on a char boundary
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes truncated)", &s[..end], s.len() - end)
}

/// Install a global `tracing` subscriber
///
/// Does nothing if one is already installed, so embedding applications
/// and tests may call it freely.
pub fn init_logging(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(config.level.as_str());

    let _ = if config.format == "json" {
        builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init()
    } else {
        builder
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_body_untouched() {
        assert_eq!(truncate_body(b"{\"ok\":true}", 100), "{\"ok\":true}");
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(120);
        let out = truncate_body(body.as_bytes(), 100);
        assert!(out.starts_with(&"x".repeat(100)));
        assert!(out.ends_with("(20 bytes truncated)"));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        let out = truncate_content("привет", 3);
        assert!(out.starts_with("п"));
        assert!(out.contains("bytes truncated"));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(&LoggingConfig::default());
        init_logging(&LoggingConfig::default());
    }
}
