//! Timestamp utilities
//!
//! All timestamps cross the wire and sit in the stores as
//! `YYYY-MM-DD HH:MM:SS` text (UTC). The format sorts chronologically,
//! so ORDER BY on the stored column gives time order directly.

use chrono::Utc;

/// Wire and storage format for all Mixtape timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in wire format
pub fn now_string() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_now_string_round_trips() {
        let s = now_string();
        let parsed = NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT);
        assert!(parsed.is_ok(), "should parse back: {}", s);
    }

    #[test]
    fn test_format_shape() {
        let s = now_string();
        // e.g. "2024-03-01 17:05:09"
        assert_eq!(s.len(), 19);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
        assert_eq!(&s[13..14], ":");
    }

    #[test]
    fn test_lexicographic_order_is_chronological() {
        let earlier = "2023-01-02 23:59:59";
        let later = "2023-01-03 00:00:00";
        assert!(earlier < later);
    }
}
