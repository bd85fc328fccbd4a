//! CSV output of lookup rows.

use super::time::format_local_time;
use crate::models::IpLookupRow;
use chrono::{DateTime, Utc};
use itertools::Itertools;

pub const CSV_HEADER: &str =
    r#""index","ip","status","country","country_code","timezone","local_time","error""#;

/// Quote a field when it contains a comma, quote or line break.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n', '\r']) {
        // excel does not like spaces after comma between fields
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

/// One CSV line for a row. `index` is 0-based and written 1-based.
pub fn csv_row(index: usize, row: &IpLookupRow, now: DateTime<Utc>) -> String {
    let local_time = row
        .timezone
        .as_deref()
        .and_then(|tz| format_local_time(now, tz))
        .unwrap_or_default();
    let status = row.status.to_string();
    let fields = [
        (index + 1).to_string(),
        row.ip.clone(),
        status,
        row.country.clone().unwrap_or_default(),
        row.country_code.clone().unwrap_or_default(),
        row.timezone.clone().unwrap_or_default(),
        local_time,
        row.error.clone().unwrap_or_default(),
    ];
    fields.iter().map(|f| escape_csv_field(f)).join(",")
}

/// Print the header and every row as CSV to stdout.
pub fn print_csv(rows: &[IpLookupRow], now: DateTime<Utc>) {
    log::info!("#Start print_csv() rows={}", rows.len());
    println!("{CSV_HEADER}");
    for (i, row) in rows.iter().enumerate() {
        println!("{}", csv_row(i, row, now));
    }
}
