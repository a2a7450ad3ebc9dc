use chrono::{SecondsFormat, Utc};

pub use uuid::Uuid;
pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{avatar_glyph, Comment, CommentId, NewComment};

mod error;
pub use error::Error;

mod thread;
pub use thread::ThreadId;

/// Formats a creation time the way the comment service reports it
pub fn format_timestamp(t: &Time) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 17, 4, 12).unwrap();
        assert_eq!(format_timestamp(&t), "2024-03-09T17:04:12Z");
    }
}
