//! Date helper functions

use chrono::{DateTime, Utc};

/// Format a date with a chrono format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "%B %-d, %Y") // -> "January 15, 2024"
/// ```
pub fn format_date(date: &DateTime<Utc>, format: &str) -> String {
    date.format(format).to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Generate a <time> HTML element
pub fn time_tag(date: &DateTime<Utc>, format: &str) -> String {
    format!(
        r#"<time datetime="{}">{}</time>"#,
        date_xml(date),
        format_date(date, format)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "%Y-%m-%d"), "2024-01-05");
        assert_eq!(format_date(&date, "%B %-d, %Y"), "January 5, 2024");
    }

    #[test]
    fn test_time_tag() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(
            time_tag(&date, "%B %-d, %Y"),
            r#"<time datetime="2024-01-15T00:00:00.000Z">January 15, 2024</time>"#
        );
    }
}
