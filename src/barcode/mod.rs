//! # Badge Codes
//!
//! Two code schemes coexist:
//!
//! - **Identifier codes**: `PREFIX-<first 8 chars of record id>-<epoch millis>`,
//!   human-inspectable business keys (staff badges, truncated to 20 chars).
//! - **Numeric codes**: a fixed number of digits derived from a seed by
//!   dropping every non-digit, then truncating or zero-padding.
//!
//! A stored badge id is always reused verbatim on reprint, whichever scheme
//! produced it, so lookups must tolerate both. [`validate_barcode`] and
//! [`parse_barcode`] check the stricter four-segment lookup format and
//! return `false`/`None` rather than failing.
//!
//! Rendering codes as scannable images lives in [`symbology`].

pub mod symbology;

use serde::{Deserialize, Serialize};

pub use symbology::{SymbologyOptions, render_code128};

/// Staff badge ids are cut to this length.
pub const STAFF_BADGE_ID_MAX_LEN: usize = 20;

/// Digits in a participant's numeric badge code.
pub const PARTICIPANT_CODE_LEN: usize = 12;

/// `PREFIX-<first 8 chars of id>-<millis>`, prefix uppercased.
pub fn generate_identifier_code(prefix: &str, record_id: &str, timestamp_millis: i64) -> String {
    let sample: String = record_id.chars().take(8).collect();
    format!("{}-{}-{}", prefix.to_uppercase(), sample, timestamp_millis)
}

/// Keep only the digits of `seed`, then truncate or right-pad with `0`
/// to exactly `length` characters.
pub fn generate_barcode(seed: &str, length: usize) -> String {
    let mut code: String = seed
        .chars()
        .filter(char::is_ascii_digit)
        .take(length)
        .collect();
    while code.len() < length {
        code.push('0');
    }
    code
}

/// Cut a code to at most `max_len` characters.
pub fn truncate_code(code: &str, max_len: usize) -> String {
    code.chars().take(max_len).collect()
}

/// Loose check for identifier codes: `PREFIX-<1..8 alnum>-<digits>`.
///
/// Accepts truncated staff ids, whose timestamp segment may be cut short.
pub fn is_identifier_code(code: &str) -> bool {
    let mut parts = code.splitn(3, '-');
    let (Some(prefix), Some(sample), Some(stamp)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    !prefix.is_empty()
        && prefix.chars().all(|c| c.is_ascii_uppercase())
        && (1..=8).contains(&sample.len())
        && sample.chars().all(|c| c.is_ascii_alphanumeric())
        && !stamp.is_empty()
        && stamp.chars().all(|c| c.is_ascii_digit())
}

/// The four segments of a lookup barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBarcode {
    pub segments: [String; 4],
}

/// `SEGMENT-SEGMENT-SEGMENT-SEGMENT`, each segment non-empty uppercase
/// letters or digits. Returns `None` for anything else.
pub fn parse_barcode(code: &str) -> Option<ParsedBarcode> {
    let parts: Vec<&str> = code.split('-').collect();
    let [a, b, c, d] = parts.as_slice() else {
        return None;
    };
    let segments = [*a, *b, *c, *d];
    let valid = segments.iter().all(|s| {
        !s.is_empty()
            && s.chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
    });
    valid.then(|| ParsedBarcode {
        segments: segments.map(str::to_string),
    })
}

pub fn validate_barcode(code: &str) -> bool {
    parse_barcode(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_code_truncates() {
        let code = generate_barcode("PART-abcdef12-1700000000000", 12);
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(code, "121700000000");
    }

    #[test]
    fn test_numeric_code_pads() {
        assert_eq!(generate_barcode("A1-B2", 6), "120000");
        assert_eq!(generate_barcode("", 4), "0000");
    }

    #[test]
    fn test_identifier_code() {
        let code = generate_identifier_code("staff", "3f2a9c1e-77aa-4b", 1_700_000_000_000);
        assert_eq!(code, "STAFF-3f2a9c1e-1700000000000");
        assert!(is_identifier_code(&code));

        let truncated = truncate_code(&code, STAFF_BADGE_ID_MAX_LEN);
        assert_eq!(truncated, "STAFF-3f2a9c1e-17000");
        assert!(is_identifier_code(&truncated));
    }

    #[test]
    fn test_identifier_code_short_id() {
        let code = generate_identifier_code("PART", "42", 5);
        assert_eq!(code, "PART-42-5");
        assert!(is_identifier_code(&code));
    }

    #[test]
    fn test_is_identifier_code_rejects() {
        assert!(!is_identifier_code("STAFF-3f2a9c1e"));
        assert!(!is_identifier_code("staff-3f2a9c1e-1700"));
        assert!(!is_identifier_code("STAFF--1700"));
        assert!(!is_identifier_code("STAFF-abc-17x0"));
        assert!(!is_identifier_code("121700000000"));
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("ABC123-DEF456-GHI789-JKL012"));
        assert!(!validate_barcode("not-a-barcode"));
        assert!(!validate_barcode("ABC-DEF-GHI"));
        assert!(!validate_barcode("ABC-DEF-GHI-JKL-MNO"));
        assert!(!validate_barcode("abc-DEF-GHI-JKL"));
        assert!(!validate_barcode("ABC--GHI-JKL"));
    }

    #[test]
    fn test_parse_barcode() {
        let parsed = parse_barcode("ABC123-DEF456-GHI789-JKL012").unwrap();
        assert_eq!(parsed.segments[0], "ABC123");
        assert_eq!(parsed.segments[3], "JKL012");
        assert_eq!(parse_barcode("STAFF-3f2a9c1e-17000"), None);
        assert_eq!(parse_barcode(""), None);
    }
}
