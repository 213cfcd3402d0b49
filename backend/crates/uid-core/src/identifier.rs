//! Canonical identifier formatting and parsing.
//!
//! A canonical identifier is `<prefix><serial><DDMMYY>`: a two letter role
//! prefix, an unpadded decimal serial and a fixed-width creation date.

use chrono::{DateTime, Utc};

/// Prefix used when a role id is missing or has fewer than two letters.
pub const FALLBACK_PREFIX: &str = "ge";

/// Width of the `DDMMYY` date suffix.
pub const DATE_SUFFIX_LEN: usize = 6;

const KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("admin", "ad"),
    ("client", "cl"),
    ("editor", "ed"),
    ("developer", "dv"),
    ("manager", "pm"),
    ("freelancer", "fr"),
];

/// Resolve the two letter prefix for a role id.
pub fn role_prefix(role_id: Option<&str>) -> String {
    let Some(role_id) = role_id.map(str::trim).filter(|r| !r.is_empty()) else {
        return FALLBACK_PREFIX.to_string();
    };

    let lowered = role_id.to_lowercase();
    if let Some((_, prefix)) = KNOWN_PREFIXES.iter().find(|(role, _)| *role == lowered) {
        return (*prefix).to_string();
    }

    let letters: String = lowered
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(2)
        .collect();

    if letters.len() == 2 {
        letters
    } else {
        FALLBACK_PREFIX.to_string()
    }
}

/// Render an instant as `DDMMYY`. `None` renders the current time.
pub fn format_date(instant: Option<DateTime<Utc>>) -> String {
    instant
        .unwrap_or_else(Utc::now)
        .format("%d%m%y")
        .to_string()
}

pub fn build_identifier(
    role_id: Option<&str>,
    serial: u64,
    instant: Option<DateTime<Utc>>,
) -> String {
    format!("{}{}{}", role_prefix(role_id), serial, format_date(instant))
}

/// Extract the serial from a candidate identifier for the given role.
///
/// Returns `None` when the candidate is missing, carries another prefix,
/// is too short to hold the date suffix, contains non-digits after the
/// prefix, or encodes a zero serial.
pub fn parse_serial(candidate: Option<&str>, role_id: Option<&str>) -> Option<u64> {
    parse_serial_for_prefix(candidate?, &role_prefix(role_id))
}

pub fn parse_serial_for_prefix(candidate: &str, prefix: &str) -> Option<u64> {
    let rest = candidate.strip_prefix(prefix)?;
    if rest.len() <= DATE_SUFFIX_LEN || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    rest[..rest.len() - DATE_SUFFIX_LEN]
        .parse::<u64>()
        .ok()
        .filter(|serial| *serial > 0)
}

/// Legacy keys are the email addresses accounts were originally stored under.
pub fn is_legacy_key(key: &str) -> bool {
    key.contains('@')
}

pub fn is_canonical(candidate: Option<&str>, role_id: Option<&str>) -> bool {
    parse_serial(candidate, role_id).is_some()
}
