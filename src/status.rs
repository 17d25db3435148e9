//! Canonical reason phrases for HTTP status codes.

use http::StatusCode;

/// Returns the canonical reason phrase for `status`, or `"Unknown"` when the
/// code has no registered phrase.
///
/// Used to backfill [`ResponseDescriptor::status_text`] when the executor
/// supplies an empty status text (common for HTTP/2, which carries no reason
/// phrase on the wire).
///
/// [`ResponseDescriptor::status_text`]: crate::ResponseDescriptor::status_text
#[must_use]
pub fn status_text_for(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_codes() {
        assert_eq!(status_text_for(100), "Continue");
        assert_eq!(status_text_for(200), "OK");
        assert_eq!(status_text_for(204), "No Content");
        assert_eq!(status_text_for(301), "Moved Permanently");
        assert_eq!(status_text_for(404), "Not Found");
        assert_eq!(status_text_for(418), "I'm a teapot");
        assert_eq!(status_text_for(503), "Service Unavailable");
    }

    #[test]
    fn unregistered_codes_fall_back() {
        assert_eq!(status_text_for(999), "Unknown");
        assert_eq!(status_text_for(0), "Unknown");
        assert_eq!(status_text_for(599), "Unknown");
    }
}
