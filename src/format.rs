//! Number and date formatting helpers.
//!
//! All functions are pure and total: any `f64` or string yields a string.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Marker returned for dates that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Format `amount` with two decimals and thousands grouping, prefixed by
/// `symbol`: `format_currency(1234.5, "$") == "$1,234.50"`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    format!("{}{}", symbol, grouped_fixed2(amount))
}

/// Format `value` with two decimals and a trailing `%`.
pub fn format_percentage(value: f64) -> String {
    format!("{}%", grouped_fixed2(value))
}

/// Format with a B/M/K suffix and one decimal, or the plain value below 1000.
pub fn format_large_number(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        // f64's Display is already the shortest round-trip form ("999", "12.5")
        format!("{}", value)
    }
}

/// Two fixed decimals with en-US grouping. `-0.001` renders as `-0.00`.
fn grouped_fixed2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".into() } else { "-∞".into() };
    }

    let cents = (value.abs() * 100.0).round();
    let whole = (cents / 100.0).trunc();
    let frac = (cents % 100.0) as u8;
    let sign = if value.is_sign_negative() { "-" } else { "" };

    let grouped = if whole < u128::MAX as f64 {
        (whole as u128).to_formatted_string(&Locale::en)
    } else {
        group_digits(&format!("{:.0}", whole))
    };
    format!("{}{}.{:02}", sign, grouped, frac)
}

/// Insert en thousands separators into a plain digit string.
fn group_digits(digits: &str) -> String {
    let separator = Locale::en.separator();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Date rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    /// `10/18/2026`
    Short,
    /// `Oct 18, 2026`
    #[default]
    Medium,
    /// `Sunday, October 18, 2026`
    Long,
    /// `02:05 PM`
    Time,
    /// `10/18/2026, 2:05:09 PM`
    DateTime,
}

impl FromStr for DateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(DateMode::Short),
            "medium" => Ok(DateMode::Medium),
            "long" => Ok(DateMode::Long),
            "time" => Ok(DateMode::Time),
            "datetime" => Ok(DateMode::DateTime),
            other => Err(format!("unknown date format: {other}")),
        }
    }
}

/// Parse `input` and render it in `mode`. Unparsable input yields
/// [`INVALID_DATE`].
pub fn format_date(input: &str, mode: DateMode) -> String {
    match parse_date(input) {
        Some(dt) => format_datetime(&dt, mode),
        None => INVALID_DATE.to_string(),
    }
}

/// Render an already parsed local date-time.
pub fn format_datetime(dt: &NaiveDateTime, mode: DateMode) -> String {
    let pattern = match mode {
        DateMode::Short => "%-m/%-d/%Y",
        DateMode::Medium => "%b %-d, %Y",
        DateMode::Long => "%A, %B %-d, %Y",
        DateMode::Time => "%I:%M %p",
        DateMode::DateTime => "%-m/%-d/%Y, %-I:%M:%S %p",
    };
    dt.format(pattern).to_string()
}

/// Accepts RFC 3339 and RFC 2822 (HTTP `Date`), both converted to local
/// time, naive date-times with a space or `T` separator, and bare dates
/// (taken as local midnight).
fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for pattern in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, "$"), "$1,234.50");
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(1_000_000.999, "₹"), "₹1,000,001.00");
        assert_eq!(format_currency(-42.1, "$"), "$-42.10");
    }

    #[test]
    fn test_format_currency_is_total() {
        assert_eq!(format_currency(f64::NAN, "$"), "$NaN");
        assert_eq!(format_currency(f64::INFINITY, "$"), "$∞");
    }

    #[test]
    fn test_format_currency_beyond_u64() {
        assert_eq!(format_currency(1e20, "$"), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(-1e20, "$"), "$-100,000,000,000,000,000,000.00");

        let huge = format_currency(1e40, "$");
        let digits = huge.chars().filter(char::is_ascii_digit).count();
        // 40 or 41 integer digits depending on rounding, plus two decimals
        assert!((42..=43).contains(&digits));
        assert!(!huge.contains("340,282,366"));
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1"), "1");
        assert_eq!(group_digits("123"), "123");
        assert_eq!(group_digits("1234"), "1,234");
        assert_eq!(group_digits("123456789"), "123,456,789");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(3.14159), "3.14%");
        assert_eq!(format_percentage(-0.5), "-0.50%");
        assert_eq!(format_percentage(1234.0), "1,234.00%");
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(1_500_000_000.0), "1.5B");
        assert_eq!(format_large_number(2_300.0), "2.3K");
        assert_eq!(format_large_number(999.0), "999");
        assert_eq!(format_large_number(12_400_000.0), "12.4M");
        assert_eq!(format_large_number(12.5), "12.5");
        assert_eq!(format_large_number(1_000.0), "1.0K");
    }

    #[test]
    fn test_format_datetime_modes() {
        let dt = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(format_datetime(&dt, DateMode::Short), "10/18/2026");
        assert_eq!(format_datetime(&dt, DateMode::Medium), "Oct 18, 2026");
        assert_eq!(format_datetime(&dt, DateMode::Long), "Sunday, October 18, 2026");
        assert_eq!(format_datetime(&dt, DateMode::Time), "02:05 PM");
        assert_eq!(format_datetime(&dt, DateMode::DateTime), "10/18/2026, 2:05:09 PM");
    }

    #[test]
    fn test_format_date_naive_inputs() {
        assert_eq!(format_date("2024-03-01", DateMode::Medium), "Mar 1, 2024");
        assert_eq!(format_date("2024-03-01 09:30:00", DateMode::Time), "09:30 AM");
        assert_eq!(format_date("2024-03-01T16:00:00", DateMode::Short), "3/1/2024");
    }

    #[test]
    fn test_format_date_zoned_inputs_parse() {
        assert_ne!(format_date("2024-03-01T12:00:00Z", DateMode::Long), INVALID_DATE);
        assert_ne!(
            format_date("Sun, 18 Oct 2026 14:05:09 GMT", DateMode::DateTime),
            INVALID_DATE
        );
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(format_date("not a date", DateMode::Medium), INVALID_DATE);
        assert_eq!(format_date("", DateMode::Short), INVALID_DATE);
        assert_eq!(format_date("2024-13-40", DateMode::Long), INVALID_DATE);
    }

    #[test]
    fn test_date_mode_from_str() {
        assert_eq!("DateTime".parse::<DateMode>(), Ok(DateMode::DateTime));
        assert!("weekly".parse::<DateMode>().is_err());
    }
}
