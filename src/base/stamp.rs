//! Timestamps embedded in produced file names.

use time::OffsetDateTime;

/// Local-time `YYYYMMDD_HHMMSS`, UTC if the local offset is unknown.
///
/// Lexical order of stamps is chronological order.
pub fn file_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = time::macros::format_description!("[year][month][day]_[hour][minute][second]");
    now.format(format)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_timestamp_shape() {
        let stamp = file_timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
