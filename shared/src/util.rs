use chrono::Datelike;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Calendar year (UTC) of a millisecond timestamp
///
/// Out-of-range timestamps fall back to the current year.
pub fn year_of_millis(millis: i64) -> i32 {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_else(chrono::Utc::now)
        .year()
}

/// Millisecond duration helpers
pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of_millis() {
        // 2026-12-31T23:59:59Z
        assert_eq!(year_of_millis(1_798_761_599_000), 2026);
        // 2027-01-01T00:00:00Z
        assert_eq!(year_of_millis(1_798_761_600_000), 2027);
    }
}
