//! Reversible report-number encoding and report-number formatting.
//!
//! Storage keys are derived from report numbers through a deterministic,
//! reversible transform: adjacent bytes are swapped, the result is
//! base64-encoded (URL-safe, unpadded), and a fixed namespace prefix marks
//! the key as belonging to this scheme. The transform obfuscates ids in
//! logs and URLs; it is not cryptographic, and uniqueness comes entirely
//! from report-number uniqueness.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Namespace prefix on every encoded id
pub const ID_PREFIX: &str = "dcr_";

/// Prefix on every report number
pub const NUMBER_PREFIX: &str = "DCR";

/// Width of the zero-padded numeric suffix
const SEQUENCE_WIDTH: usize = 6;

/// Derive the storage key for a report number.
///
/// Total for any text input; `decode(encode(n)) == Some(n)` for all `n`.
pub fn encode(report_number: &str) -> String {
    let mut bytes = report_number.as_bytes().to_vec();
    swap_adjacent(&mut bytes);
    format!("{ID_PREFIX}{}", URL_SAFE_NO_PAD.encode(&bytes))
}

/// Recover the report number behind a storage key.
///
/// Returns `None` for anything not produced by [`encode`]: a missing
/// prefix, invalid base64, or a payload that is not UTF-8. Malformed input
/// is treated as unknown, never as an error.
pub fn decode(id: &str) -> Option<String> {
    let payload = id.strip_prefix(ID_PREFIX)?;
    let mut bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    swap_adjacent(&mut bytes);
    String::from_utf8(bytes).ok()
}

/// Format a report number from its year and sequence counter
pub fn format_report_number(year: i32, sequence: u32) -> String {
    format!("{NUMBER_PREFIX}-{year}-{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Split a well-formed report number into (year, sequence).
///
/// Returns `None` when the text does not follow `DCR-<year>-<sequence>`.
pub fn parse_report_number(number: &str) -> Option<(i32, u32)> {
    let rest = number.strip_prefix(NUMBER_PREFIX)?.strip_prefix('-')?;
    let (year, sequence) = rest.split_once('-')?;
    Some((year.parse().ok()?, sequence.parse().ok()?))
}

// Swapping adjacent bytes is its own inverse; a trailing odd byte stays put.
fn swap_adjacent(bytes: &mut [u8]) {
    for pair in bytes.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_is_deterministic_and_prefixed() {
        let a = encode("DCR-2026-000001");
        let b = encode("DCR-2026-000001");
        assert_eq!(a, b);
        assert!(a.starts_with(ID_PREFIX));
        // Obfuscated: the raw number must not appear in the key
        assert!(!a.contains("DCR-2026"));
    }

    #[test]
    fn test_decode_roundtrip() {
        let number = "DCR-2026-000042";
        assert_eq!(decode(&encode(number)).as_deref(), Some(number));
    }

    #[test]
    fn test_decode_rejects_foreign_input() {
        assert_eq!(decode("DCR-2026-000001"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("dcr_!!!not-base64!!!"), None);
        // Valid base64 that decodes to invalid UTF-8
        let bogus = format!("{ID_PREFIX}{}", URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]));
        assert_eq!(decode(&bogus), None);
    }

    #[test]
    fn test_format_report_number_zero_pads() {
        assert_eq!(format_report_number(2026, 1), "DCR-2026-000001");
        assert_eq!(format_report_number(2026, 123456), "DCR-2026-123456");
    }

    #[test]
    fn test_parse_report_number() {
        assert_eq!(parse_report_number("DCR-2026-000035"), Some((2026, 35)));
        assert_eq!(parse_report_number("DCR-2026"), None);
        assert_eq!(parse_report_number("XYZ-2026-000035"), None);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_printable(number in "[ -~]{1,64}") {
            let decoded = decode(&encode(&number));
            prop_assert_eq!(decoded.as_deref(), Some(number.as_str()));
        }

        #[test]
        fn prop_roundtrip_wellformed_numbers(year in 2000i32..2100, seq in 0u32..=999_999) {
            let number = format_report_number(year, seq);
            prop_assert_eq!(decode(&encode(&number)), Some(number));
        }

        #[test]
        fn prop_decode_never_panics(id in "\\PC*") {
            let _ = decode(&id);
        }
    }
}
