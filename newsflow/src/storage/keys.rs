//! Object key naming.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Suffix for ingested search requests.
pub const SEARCH_TERMS_SUFFIX: &str = "search-terms.json";

/// Suffix for transformed content documents.
pub const TRANSFORMED_CONTENT_SUFFIX: &str = "transformed-content.json";

/// Builds `{Y}-{M}-{D}-{HHMMSS}-{suffix}`.
///
/// Month and day are not zero-padded; the time is.
#[must_use]
pub fn timestamped_key(at: DateTime<Utc>, suffix: &str) -> String {
    format!(
        "{}-{}-{}-{:02}{:02}{:02}-{suffix}",
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_and_day_not_padded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            timestamped_key(at, TRANSFORMED_CONTENT_SUFFIX),
            "2024-3-7-090501-transformed-content.json"
        );
    }

    #[test]
    fn test_double_digit_fields() {
        let at = Utc.with_ymd_and_hms(2023, 11, 21, 23, 59, 58).unwrap();
        assert_eq!(timestamped_key(at, SEARCH_TERMS_SUFFIX), "2023-11-21-235958-search-terms.json");
    }
}
