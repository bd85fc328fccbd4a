//! Validation of user typed IPv4 addresses.
//!
//! [`validate`] is the check run before any lookup: it normalizes the input,
//! rejects URLs, CIDR, ports and IPv6, checks dotted-quad syntax and refuses
//! reserved ranges. Every failure carries exactly one user facing reason.

use crate::models::reserved_reason;
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

pub const IP_REQUIRED: &str = "IP is required";
pub const NOT_A_URL: &str = "Please enter only an IP (not a URL)";
pub const CIDR_NOT_SUPPORTED: &str = "CIDR notation is not supported (e.g. /24)";
pub const NO_QUERY_OR_HASH: &str = "Please enter only an IP (no query/hash)";
pub const PORT_NOT_SUPPORTED: &str = "IP with port is not supported (remove :port)";
pub const IPV6_NOT_SUPPORTED: &str = "IPv6 is not supported (yet)";
pub const ONLY_IPV4: &str = "Only IPv4 is supported (digits and dots)";
pub const INVALID_IPV4: &str = "Invalid IPv4 address";

/// Result of validating one input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Public IPv4 address, whitespace stripped, digits as typed.
    Accepted { normalized_address: String },
    /// Why the input was refused.
    Rejected { reason: String },
}

impl ValidationOutcome {
    fn rejected(reason: &str) -> Self {
        ValidationOutcome::Rejected {
            reason: reason.to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }

    /// Convert into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            ValidationOutcome::Accepted { normalized_address } => Ok(normalized_address),
            ValidationOutcome::Rejected { reason } => Err(reason),
        }
    }
}

/// Validate and classify a user typed address.
///
/// Stages run in a fixed order, the first failing one decides the message.
///
/// # Examples
/// ```
/// use ip_geo_lookup::validation::{validate, ValidationOutcome};
/// assert_eq!(
///     validate(" 8.8.8.8 "),
///     ValidationOutcome::Accepted { normalized_address: "8.8.8.8".to_string() }
/// );
/// ```
pub fn validate(input: &str) -> ValidationOutcome {
    let value = normalize(input);
    log::debug!("validate({input:?}) normalized={value:?}");

    if value.is_empty() {
        return ValidationOutcome::rejected(IP_REQUIRED);
    }
    if let Some(reason) = non_address_reason(&value) {
        return ValidationOutcome::rejected(reason);
    }
    if !value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return ValidationOutcome::rejected(ONLY_IPV4);
    }
    let addr = match parse_dotted_quad(&value) {
        Some(addr) => addr,
        None => return ValidationOutcome::rejected(INVALID_IPV4),
    };
    if let Some(reason) = reserved_reason(addr) {
        log::debug!("{addr} rejected: {reason}");
        return ValidationOutcome::rejected(reason);
    }

    ValidationOutcome::Accepted {
        normalized_address: value,
    }
}

/// Syntax-only check from the first version of the lookup form.
///
/// Trims the input and matches a strict dotted-quad pattern. Does not remove
/// internal whitespace and does not refuse reserved ranges; use [`validate`]
/// for anything sent to the lookup service.
pub fn validate_ipv4(input: &str) -> ValidationOutcome {
    let value = input.trim_matches(is_input_whitespace);
    if value.is_empty() {
        return ValidationOutcome::rejected(IP_REQUIRED);
    }
    if !get_ipv4_regex().is_match(value) {
        return ValidationOutcome::rejected(INVALID_IPV4);
    }
    ValidationOutcome::Accepted {
        normalized_address: value.to_string(),
    }
}

static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| {
        let octet = r"(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";
        Regex::new(&format!(r"^{octet}(\.{octet}){{3}}$")).expect("Invalid Regex")
    })
}

/// Whitespace as typed input sees it: the Unicode space separators, line
/// terminators and the byte-order mark. U+0085 (NEL) is not whitespace here.
pub fn is_input_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Trim, then drop every internal whitespace character.
fn normalize(input: &str) -> String {
    input
        .trim_matches(is_input_whitespace)
        .chars()
        .filter(|c| !is_input_whitespace(*c))
        .collect()
}

fn non_address_reason(value: &str) -> Option<&'static str> {
    if value.contains("://") {
        Some(NOT_A_URL)
    } else if value.contains('/') {
        Some(CIDR_NOT_SUPPORTED)
    } else if value.contains('?') || value.contains('#') {
        Some(NO_QUERY_OR_HASH)
    } else if value.contains(':') {
        if value.contains('.') {
            Some(PORT_NOT_SUPPORTED)
        } else {
            Some(IPV6_NOT_SUPPORTED)
        }
    } else {
        None
    }
}

/// Four non-empty decimal parts, no leading zeros, each 0-255.
fn parse_dotted_quad(value: &str) -> Option<Ipv4Addr> {
    let parts: Vec<&str> = value.split('.').collect();
    if parts.len() != 4 {
        return None;
    }
    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if part.len() > 1 && part.starts_with('0') {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}
