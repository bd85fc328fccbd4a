//! Local time and flag helpers.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Wall clock time in `timezone` as `HH:MM:SS` (24 hour).
///
/// Returns `None` when `timezone` is not a known IANA name.
pub fn format_local_time(now: DateTime<Utc>, timezone: &str) -> Option<String> {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            log::debug!("unknown timezone {timezone:?}");
            return None;
        }
    };
    Some(now.with_timezone(&tz).format("%H:%M:%S").to_string())
}

/// 24x18 PNG flag from flagcdn.com.
pub fn flag_url(country_code: &str) -> String {
    format!(
        "https://flagcdn.com/24x18/{}.png",
        country_code.to_lowercase()
    )
}

/// Regional indicator pair for a two letter country code, e.g. "se" -> 🇸🇪.
pub fn flag_emoji(country_code: &str) -> Option<String> {
    let code = country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}
