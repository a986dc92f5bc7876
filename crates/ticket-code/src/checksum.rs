//! CRC-10 checksum over base-32 symbol strings.
//!
//! # Construction
//!
//! Each symbol contributes its 5-bit value, most significant bit first, to a
//! 10-bit shift register with generator
//!
//! ```text
//! g(x) = x^10 + x^9 + x^5 + x^4 + x + 1      (0x233, CRC-10/ATM)
//! ```
//!
//! The register starts at zero and is not reflected or inverted. The final
//! value (0..1024) is written as two alphabet symbols.
//!
//! # Detection
//!
//! Substituting one symbol flips a burst of at most 5 adjacent bits. `g` has
//! degree 10 and a non-zero constant term, so no such burst is a multiple of
//! `g`: every single-symbol substitution changes the checksum. Transpositions
//! and multi-symbol errors are caught with probability ~1 - 2^-10.

use crate::alphabet::{self, normalize, BITS_PER_SYMBOL};
use crate::error::CodeError;

/// Generator polynomial without the implicit x^10 term.
pub const CRC10_POLY: u16 = 0x233;

/// Register width in bits.
pub const CRC10_BITS: u32 = 10;

/// Symbols used to render the checksum.
pub const CHECKSUM_WIDTH: usize = 2;

const CRC10_MASK: u16 = (1 << CRC10_BITS) - 1;

// ============================================================================
// CORE ARITHMETIC
// ============================================================================

/// Raw CRC-10 register over a sequence of 5-bit symbol values.
pub fn crc10(values: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &value in values {
        for bit in (0..BITS_PER_SYMBOL).rev() {
            let input = ((value >> bit) & 1) as u16;
            let top = (crc >> (CRC10_BITS - 1)) & 1;
            crc = (crc << 1) & CRC10_MASK;
            if top ^ input == 1 {
                crc ^= CRC10_POLY;
            }
        }
    }
    crc
}

/// Split a normalized string into its (payload, checksum) halves by symbol.
fn split_tail(normalized: &str) -> (String, String) {
    let chars: Vec<char> = normalized.chars().collect();
    let cut = chars.len().saturating_sub(CHECKSUM_WIDTH);
    (
        chars[..cut].iter().collect(),
        chars[cut..].iter().collect(),
    )
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Checksum of `data` as two symbols.
///
/// `data` is normalized first; a character outside the alphabet fails with
/// [`CodeError::DecodeFailure`].
pub fn checksum(data: &str) -> Result<String, CodeError> {
    let normalized = normalize(data);
    let values = alphabet::symbol_values(&normalized)?;
    alphabet::encode(crc10(&values) as u64, CHECKSUM_WIDTH)
}

/// `data` (normalized) with its checksum appended.
pub fn append(data: &str) -> Result<String, CodeError> {
    let normalized = normalize(data);
    let check = checksum(&normalized)?;
    Ok(normalized + &check)
}

/// Trailing checksum symbols of `code` (the whole input if shorter than two).
pub fn extract(code: &str) -> String {
    split_tail(&normalize(code)).1
}

/// Everything in `code` before the checksum symbols.
pub fn strip(code: &str) -> String {
    split_tail(&normalize(code)).0
}

/// Recompute and compare the checksum of `code`.
///
/// Returns false for input too short to hold a payload and a checksum, for a
/// payload containing non-alphabet characters, and for any mismatch.
pub fn validate(code: &str) -> bool {
    let normalized = normalize(code);
    if normalized.chars().count() <= CHECKSUM_WIDTH {
        return false;
    }

    let (payload, found) = split_tail(&normalized);
    match checksum(&payload) {
        Ok(expected) => expected == found,
        Err(_) => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::ALPHABET;
    use proptest::prelude::*;

    const PAYLOADS: &[&str] = &[
        "0000000000000000000000",
        "ZZZZZZZZZZZZZZZZZZZZZZ",
        "C1S0Z0Q8RS034G000FM0Z7",
        "0123456789ABCDEFGHJKMN",
        "7",
    ];

    #[test]
    fn test_crc10_of_zeros_is_zero() {
        assert_eq!(crc10(&[]), 0);
        assert_eq!(crc10(&[0; 22]), 0);
    }

    #[test]
    fn test_crc10_single_bit_is_polynomial_shift() {
        // Message "00001" is M(x) = 1, and M(x) * x^10 mod g(x) is g(x) - x^10.
        assert_eq!(crc10(&[1]), CRC10_POLY);
        assert_eq!(crc10(&[0, 0, 1]), CRC10_POLY);
    }

    #[test]
    fn test_crc10_stays_within_ten_bits() {
        let values: Vec<u8> = (0..32).collect();
        assert!(crc10(&values) < 1 << CRC10_BITS);
    }

    #[test]
    fn test_checksum_width_and_normalization() {
        let a = checksum("c1s0z0q8").unwrap();
        let b = checksum("C1S0-Z0Q8").unwrap();
        assert_eq!(a.len(), CHECKSUM_WIDTH);
        assert_eq!(a, b);
    }

    #[test]
    fn test_checksum_rejects_foreign_chars() {
        let err = checksum("AB#D").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_append_extract_strip() {
        let code = append("abc-123").unwrap();
        assert_eq!(code.len(), 8);
        assert_eq!(strip(&code), "ABC123");
        assert_eq!(extract(&code), checksum("ABC123").unwrap());
        assert!(validate(&code));
    }

    #[test]
    fn test_extract_strip_short_input() {
        assert_eq!(extract("A"), "A");
        assert_eq!(strip("A"), "");
        assert_eq!(extract(""), "");
        assert!(!validate(""));
        assert!(!validate("AB"));
    }

    #[test]
    fn test_validate_rejects_foreign_payload() {
        assert!(!validate("AB#D00"));
    }

    #[test]
    fn test_every_single_substitution_detected() {
        for payload in PAYLOADS {
            let code = append(payload).unwrap();
            let symbols: Vec<char> = code.chars().collect();
            let data_len = symbols.len() - CHECKSUM_WIDTH;

            for pos in 0..data_len {
                for &replacement in ALPHABET.iter() {
                    let replacement = replacement as char;
                    if replacement == symbols[pos] {
                        continue;
                    }
                    let mut corrupted = symbols.clone();
                    corrupted[pos] = replacement;
                    let corrupted: String = corrupted.into_iter().collect();
                    assert!(
                        !validate(&corrupted),
                        "substitution {} -> {} at {} in {} went undetected",
                        symbols[pos],
                        replacement,
                        pos,
                        code
                    );
                }
            }
        }
    }

    #[test]
    fn test_checksum_symbol_corruption_detected() {
        let code = append(PAYLOADS[2]).unwrap();
        let mut symbols: Vec<char> = code.chars().collect();
        let last = symbols.len() - 1;
        symbols[last] = if symbols[last] == '0' { '1' } else { '0' };
        let corrupted: String = symbols.into_iter().collect();
        assert!(!validate(&corrupted));
    }

    proptest! {
        #[test]
        fn prop_append_validates(payload in "[0-9A-HJKMNP-TV-Z]{1,30}") {
            let code = append(&payload).unwrap();
            prop_assert!(validate(&code));
            prop_assert_eq!(strip(&code), payload);
        }

        #[test]
        fn prop_single_substitution_detected(
            payload in "[0-9A-HJKMNP-TV-Z]{22}",
            pos in 0usize..22,
            delta in 1u8..32,
        ) {
            let code = append(&payload).unwrap();
            let mut symbols: Vec<char> = code.chars().collect();
            let original = alphabet::symbol_value(symbols[pos]).unwrap();
            symbols[pos] = alphabet::symbol((original + delta) % 32);
            let corrupted: String = symbols.into_iter().collect();
            prop_assert!(!validate(&corrupted));
        }
    }
}
