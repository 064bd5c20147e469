//! Tracking codes and record ids for griv grievances
//!
//! Tracking codes are the citizen-facing contract: TMC + 7 zero-padded
//! digits, assigned monotonically in creation order and never reused.
//! Record ids are opaque hash-based ids (grv-xxxxxxxx).

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Tracking code prefix, fixed for compatibility with issued codes
pub const TRACKING_PREFIX: &str = "TMC";

/// Number of digits in a tracking code
pub const TRACKING_DIGITS: usize = 7;

/// Format a sequence number as a tracking code
///
/// `format_tracking_id(2024009)` -> `"TMC2024009"`
pub fn format_tracking_id(seq: u64) -> String {
    format!("{}{:0width$}", TRACKING_PREFIX, seq, width = TRACKING_DIGITS)
}

/// Parse the sequence number out of a tracking code, case-insensitive
///
/// Returns `None` unless the input is exactly TMC followed by 7 digits.
pub fn parse_tracking_seq(code: &str) -> Option<u64> {
    let code = code.trim();
    if code.len() != TRACKING_PREFIX.len() + TRACKING_DIGITS {
        return None;
    }
    let (prefix, digits) = code.split_at(TRACKING_PREFIX.len());
    if !prefix.eq_ignore_ascii_case(TRACKING_PREFIX) {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Check whether a string looks like a tracking code
pub fn is_tracking_id(s: &str) -> bool {
    parse_tracking_seq(s).is_some()
}

/// Generate an opaque unique id
///
/// Uses UUID + timestamp hash, encoded as base32 lowercase.
/// Format: prefix-xxxxxxxx where xxxxxxxx is 8 alphanumeric chars.
pub fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    // Take first 5 bytes, encode as base32 lowercase (8 chars)
    let encoded = base32::encode(base32::Alphabet::Crockford, &hash[..5])
        .to_lowercase()
        .chars()
        .take(8)
        .collect::<String>();

    format!("{}-{}", prefix, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tracking_id() {
        assert_eq!(format_tracking_id(2024009), "TMC2024009");
        assert_eq!(format_tracking_id(42), "TMC0000042");
    }

    #[test]
    fn test_parse_tracking_seq_case_insensitive() {
        assert_eq!(parse_tracking_seq("TMC2024009"), Some(2024009));
        assert_eq!(parse_tracking_seq("tmc2024009"), Some(2024009));
        assert_eq!(parse_tracking_seq("Tmc0000042"), Some(42));
    }

    #[test]
    fn test_parse_tracking_seq_rejects_malformed() {
        assert_eq!(parse_tracking_seq("TMC123"), None); // too short
        assert_eq!(parse_tracking_seq("TMC12345678"), None); // too long
        assert_eq!(parse_tracking_seq("ABC2024009"), None); // wrong prefix
        assert_eq!(parse_tracking_seq("TMC20240x9"), None); // non-digit
        assert_eq!(parse_tracking_seq("grv-abc123"), None);
    }

    #[test]
    fn test_generate_id() {
        let id = generate_id("grv");
        assert!(id.starts_with("grv-"));
        assert_eq!(id.len(), 12); // grv- + 8 chars
    }
}
