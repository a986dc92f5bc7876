//! Base-32 alphabet, integer ↔ symbol conversion and input normalization.
//!
//! The alphabet is the ten digits followed by the Latin capitals without
//! `I`, `L`, `O` and `U`:
//!
//! ```text
//! 0123456789ABCDEFGHJKMNPQRSTVWXYZ
//! ```
//!
//! Dropping those four letters means a code read aloud or copied by hand can
//! be repaired on input: `I`/`L` are read as `1`, `O` as `0` and `U` as `V`.
//! Every symbol carries exactly 5 bits, so a field of width `L` holds values in
//! `[0, 32^L)`.

use crate::error::CodeError;

/// Ordered symbol table. Index = symbol value.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Number of symbols (radix).
pub const BASE: u64 = 32;

/// Bits carried by a single symbol.
pub const BITS_PER_SYMBOL: u32 = 5;

/// Widest field whose capacity still fits in a `u64` (32^12 = 2^60).
pub const MAX_EXACT_WIDTH: usize = 12;

const _: () = assert!(ALPHABET.len() as u64 == BASE);

// ============================================================================
// SYMBOL LOOKUP
// ============================================================================

/// Map a confusable character onto its canonical symbol.
///
/// Input is expected to be uppercase already.
#[inline]
fn remap(c: char) -> char {
    match c {
        'I' | 'L' => '1',
        'O' => '0',
        'U' => 'V',
        _ => c,
    }
}

/// Symbol value (0-31) of a canonical, uppercase symbol, or None.
#[inline]
pub fn symbol_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),          // '0' -> 0, '9' -> 9
        'A'..='H' => Some(c as u8 - b'A' + 10),     // 'A' -> 10, 'H' -> 17
        'J' | 'K' => Some(c as u8 - b'J' + 18),     // 'J' -> 18, 'K' -> 19
        'M' | 'N' => Some(c as u8 - b'M' + 20),     // 'M' -> 20, 'N' -> 21
        'P'..='T' => Some(c as u8 - b'P' + 22),     // 'P' -> 22, 'T' -> 26
        'V'..='Z' => Some(c as u8 - b'V' + 27),     // 'V' -> 27, 'Z' -> 31
        _ => None,
    }
}

/// Symbol for a value in `0..32`. Higher bits are ignored.
#[inline]
pub fn symbol(value: u8) -> char {
    ALPHABET[(value & 0x1F) as usize] as char
}

/// True iff `c`, after case folding and confusable remapping, is a symbol.
///
/// Separators are not symbols: `is_valid_char('-')` is false.
pub fn is_valid_char(c: char) -> bool {
    symbol_value(remap(c.to_ascii_uppercase())).is_some()
}

// ============================================================================
// NORMALIZATION
// ============================================================================

#[inline]
fn is_separator(c: char) -> bool {
    c == '-' || c.is_whitespace()
}

/// Canonicalize user input.
///
/// Uppercases ASCII letters, drops whitespace and dashes and remaps
/// confusable letters. Characters outside the alphabet are kept so that
/// [`decode`] can report where they are. `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|&c| !is_separator(c))
        .map(|c| remap(c.to_ascii_uppercase()))
        .collect()
}

// ============================================================================
// ENCODE / DECODE
// ============================================================================

/// Number of distinct values a field of `width` symbols holds, or None when it
/// exceeds `u64`.
pub fn capacity(width: usize) -> Option<u64> {
    u32::try_from(width).ok().and_then(|w| BASE.checked_pow(w))
}

/// Encode `value` as exactly `width` symbols, most significant first.
///
/// Fails with [`CodeError::ValueOutOfRange`] when `value >= 32^width`.
pub fn encode(value: u64, width: usize) -> Result<String, CodeError> {
    if let Some(cap) = capacity(width) {
        if value >= cap {
            return Err(CodeError::ValueOutOfRange {
                field: "value",
                value,
                capacity: cap,
            });
        }
    }

    let mut out = vec![ALPHABET[0]; width];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        if rest == 0 {
            break;
        }
        *slot = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }

    // Alphabet is ASCII.
    Ok(out.into_iter().map(char::from).collect())
}

/// Encode `value` with as few symbols as possible (at least one).
pub fn encode_compact(value: u64) -> String {
    if value == 0 {
        return symbol(0).to_string();
    }

    let mut digits = Vec::with_capacity(MAX_EXACT_WIDTH + 1);
    let mut rest = value;
    while rest > 0 {
        digits.push(symbol((rest % BASE) as u8));
        rest /= BASE;
    }
    digits.iter().rev().collect()
}

/// Decode a symbol string (normalized first) into an integer.
///
/// Fails with [`CodeError::DecodeFailure`] on empty input, on a character
/// outside the alphabet, or when the value overflows 64 bits.
pub fn decode(s: &str) -> Result<u64, CodeError> {
    let normalized = normalize(s);
    if normalized.is_empty() {
        return Err(CodeError::DecodeFailure {
            position: 0,
            reason: "empty input".to_string(),
        });
    }

    let mut value: u64 = 0;
    for (position, c) in normalized.chars().enumerate() {
        let digit = symbol_value(c).ok_or_else(|| CodeError::DecodeFailure {
            position,
            reason: format!("invalid character {:?}", c),
        })?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or_else(|| CodeError::DecodeFailure {
                position,
                reason: "value overflows 64 bits".to_string(),
            })?;
    }
    Ok(value)
}

/// Symbol values of an already-normalized string.
pub(crate) fn symbol_values(normalized: &str) -> Result<Vec<u8>, CodeError> {
    normalized
        .chars()
        .enumerate()
        .map(|(position, c)| {
            symbol_value(c).ok_or_else(|| CodeError::DecodeFailure {
                position,
                reason: format!("invalid character {:?}", c),
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_symbol_value_covers_alphabet() {
        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(symbol_value(c as char), Some(i as u8), "symbol {}", c as char);
            assert_eq!(symbol(i as u8), c as char);
        }
        assert_eq!(symbol_value('I'), None);
        assert_eq!(symbol_value('L'), None);
        assert_eq!(symbol_value('O'), None);
        assert_eq!(symbol_value('U'), None);
        assert_eq!(symbol_value('a'), None); // lowercase is not canonical
    }

    #[test]
    fn test_normalize_remaps_confusables() {
        assert_eq!(normalize("abc-def"), "ABCDEF");
        assert_eq!(normalize("o1l i"), "0111");
        assert_eq!(normalize("uv"), "VV");
        assert_eq!(normalize("  7q-8z  "), "7Q8Z");
        assert_eq!(normalize("AB#C"), "AB#C"); // foreign chars survive
    }

    #[test]
    fn test_is_valid_char() {
        assert!(is_valid_char('0'));
        assert!(is_valid_char('z'));
        assert!(is_valid_char('o')); // remaps to '0'
        assert!(is_valid_char('L')); // remaps to '1'
        assert!(is_valid_char('u')); // remaps to 'V'
        assert!(!is_valid_char('-'));
        assert!(!is_valid_char(' '));
        assert!(!is_valid_char('#'));
        assert!(!is_valid_char('é'));
    }

    #[test]
    fn test_encode_fixed_width() {
        assert_eq!(encode(0, 5).unwrap(), "00000");
        assert_eq!(encode(31, 2).unwrap(), "0Z");
        assert_eq!(encode(32, 2).unwrap(), "10");
        assert_eq!(encode(1023, 2).unwrap(), "ZZ");
        assert_eq!(encode(0, 0).unwrap(), "");
    }

    #[test]
    fn test_encode_boundary() {
        for width in 1..=6 {
            let cap = capacity(width).unwrap();
            let top = encode(cap - 1, width).unwrap();
            assert_eq!(top, "Z".repeat(width));

            let err = encode(cap, width).unwrap_err();
            assert_eq!(
                err,
                CodeError::ValueOutOfRange {
                    field: "value",
                    value: cap,
                    capacity: cap,
                }
            );
        }
    }

    #[test]
    fn test_encode_beyond_u64_capacity() {
        assert_eq!(capacity(MAX_EXACT_WIDTH), Some(1 << 60));
        assert_eq!(capacity(13), None);
        let s = encode(u64::MAX, 13).unwrap();
        assert_eq!(s.len(), 13);
        assert_eq!(decode(&s).unwrap(), u64::MAX);
    }

    #[test]
    fn test_encode_compact() {
        assert_eq!(encode_compact(0), "0");
        assert_eq!(encode_compact(31), "Z");
        assert_eq!(encode_compact(32), "10");
        assert_eq!(encode_compact(999), "Z7");
    }

    #[test]
    fn test_decode_normalizes() {
        assert_eq!(decode("z7").unwrap(), 999);
        assert_eq!(decode("0-0-Z-7").unwrap(), 999);
        assert_eq!(decode("O1").unwrap(), 1);
        assert_eq!(decode("L0").unwrap(), 32);
    }

    #[test]
    fn test_decode_rejects_foreign_chars() {
        let err = decode("12#4").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DecodeFailure);
        assert_eq!(err.details().get("position").map(String::as_str), Some("2"));

        assert!(decode("").is_err());
        assert!(decode(" - ").is_err());
    }

    #[test]
    fn test_decode_overflow() {
        // 14 symbols of 'Z' is 70 bits
        assert!(decode(&"Z".repeat(14)).is_err());
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in ".{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_fixed_width_roundtrip(width in 1usize..=12, seed in any::<u64>()) {
            let cap = capacity(width).unwrap();
            let value = seed % cap;
            let encoded = encode(value, width).unwrap();
            prop_assert_eq!(encoded.len(), width);
            prop_assert_eq!(decode(&encoded).unwrap(), value);
        }

        #[test]
        fn prop_compact_roundtrip(value in any::<u64>()) {
            let encoded = encode_compact(value);
            prop_assert!(!encoded.is_empty());
            prop_assert_eq!(decode(&encoded).unwrap(), value);
        }
    }
}
