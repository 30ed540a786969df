//! HTTP date formatting.

use chrono::{DateTime, Utc};

/// Formats an instant as an RFC 7231 IMF-fixdate, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
#[must_use]
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Current UTC time as an RFC 7231 date.
#[must_use]
pub fn http_date_now() -> String {
    http_date(Utc::now())
}
