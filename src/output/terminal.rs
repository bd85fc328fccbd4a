//! Terminal output of lookup rows.
//!
//! Rows are first laid out as plain text ([`RowLines`]) and only colored when
//! printed.

use super::time::{flag_emoji, format_local_time};
use crate::models::{IpLookupRow, LookupStatus};
use chrono::{DateTime, Utc};
use colored::Colorize;
use itertools::Itertools;

/// Shown while a row waits for its lookup or local time.
pub const LOADING_MARKER: &str = "...";
/// Width of the address column, fits "255.255.255.255".
const IP_WIDTH: usize = 15;

/// Plain text layout of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLines {
    pub main: String,
    /// Error message for the line below, already indented.
    pub error: Option<String>,
    pub loading: bool,
}

/// Format a value as a left aligned field of at least `width` characters.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    format!("{value_str:<width$}")
}

/// Lay out one row. `index` is 0-based and shown 1-based.
pub fn render_row(index: usize, row: &IpLookupRow, now: DateTime<Utc>) -> RowLines {
    let number = format!("{:>2}", index + 1);
    let local_time = row
        .timezone
        .as_deref()
        .and_then(|tz| format_local_time(now, tz));

    let (right, loading) = match (row.status, local_time) {
        (LookupStatus::Success, Some(time)) => {
            let right = [
                row.country_code.as_deref().and_then(flag_emoji),
                row.country.clone(),
                Some(time),
            ]
            .into_iter()
            .flatten()
            .join(" ");
            (right, false)
        }
        (LookupStatus::Loading, _) | (LookupStatus::Success, None) => {
            (LOADING_MARKER.to_string(), true)
        }
        _ => (String::new(), false),
    };

    let main = format!("{number}  {}  {right}", format_field(&row.ip, IP_WIDTH))
        .trim_end()
        .to_string();
    let error = match (row.status, &row.error) {
        (LookupStatus::Error, Some(message)) => Some(format!("    {message}")),
        _ => None,
    };

    RowLines {
        main,
        error,
        loading,
    }
}

/// Lay out every row, error lines following their row.
pub fn render_rows(rows: &[IpLookupRow], now: DateTime<Utc>) -> Vec<RowLines> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| render_row(i, row, now))
        .collect()
}

/// Print rows to stdout with colors.
pub fn print_rows(rows: &[IpLookupRow], now: DateTime<Utc>) {
    for lines in render_rows(rows, now) {
        if lines.loading {
            println!("{}", lines.main.dimmed());
        } else {
            println!("{}", lines.main);
        }
        if let Some(error) = lines.error {
            println!("{}", error.red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn row(ip: &str, status: LookupStatus) -> IpLookupRow {
        IpLookupRow {
            ip: ip.to_string(),
            status,
            ..IpLookupRow::new(1)
        }
    }

    #[test]
    fn test_format_field() {
        assert_eq!(format_field("test", 6), "test  ");
        assert_eq!(format_field("long_value", 5), "long_value");
        assert_eq!(format_field(42, 4), "42  ");
    }

    #[test]
    fn test_render_success() {
        let mut r = row("8.8.8.8", LookupStatus::Success);
        r.country = Some("United States".to_string());
        r.country_code = Some("US".to_string());
        r.timezone = Some("America/New_York".to_string());
        let lines = render_row(0, &r, now());
        assert_eq!(
            lines.main,
            " 1  8.8.8.8          \u{1F1FA}\u{1F1F8} United States 07:00:00"
        );
        assert_eq!(lines.error, None);
        assert!(!lines.loading);
    }

    #[test]
    fn test_render_success_without_flag() {
        let mut r = row("8.8.8.8", LookupStatus::Success);
        r.country = Some("Nowhere".to_string());
        r.timezone = Some("UTC".to_string());
        assert!(render_row(0, &r, now()).main.ends_with("  Nowhere 12:00:00"));
    }

    #[test]
    fn test_render_loading() {
        let lines = render_row(2, &row("1.1.1.1", LookupStatus::Loading), now());
        assert_eq!(lines.main, " 3  1.1.1.1          ...");
        assert!(lines.loading);

        // success with an unknown timezone keeps the loader
        let mut r = row("1.1.1.1", LookupStatus::Success);
        r.timezone = Some("Not/AZone".to_string());
        assert!(render_row(0, &r, now()).loading);
    }

    #[test]
    fn test_render_error_and_idle() {
        let mut r = row("10.0.0.1", LookupStatus::Error);
        r.error = Some("Private IP is not supported".to_string());
        let lines = render_row(0, &r, now());
        assert_eq!(lines.main, " 1  10.0.0.1");
        assert_eq!(lines.error.as_deref(), Some("    Private IP is not supported"));

        let lines = render_row(0, &row("", LookupStatus::Idle), now());
        assert_eq!(lines.main, " 1");
        assert_eq!(lines.error, None);
    }

    #[test]
    fn test_render_rows_numbering() {
        let rows = vec![row("1.1.1.1", LookupStatus::Idle), row("8.8.8.8", LookupStatus::Idle)];
        let lines = render_rows(&rows, now());
        assert!(lines[0].main.starts_with(" 1  1.1.1.1"));
        assert!(lines[1].main.starts_with(" 2  8.8.8.8"));
    }
}
