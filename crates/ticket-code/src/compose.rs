//! Building ticket codes from their semantic fields.
//!
//! Identifier fields (event, category, seat) follow one policy:
//!
//! | Input                          | Result                                  |
//! |--------------------------------|-----------------------------------------|
//! | decimal integer `< capacity`   | encoded as-is, recoverable on decode    |
//! | decimal integer `>= capacity`  | `ValueOutOfRange`                       |
//! | negative integer               | `InvalidInput`                          |
//! | anything else                  | SHA-256 reduced mod capacity (lossy)    |
//!
//! The lossy path means a decoded code only ever yields numeric placeholders
//! for identifiers that were not plain numbers.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::alphabet::{self, normalize};
use crate::checksum;
use crate::error::CodeError;
use crate::layout::{Field, CODE_LENGTH, SEPARATOR};

/// Oldest event year a code can carry.
pub const MIN_YEAR: i32 = 1970;

/// Newest event year a code can carry.
pub const MAX_YEAR: i32 = 2100;

/// Width of the coarse time bucket mixed into generated sequences.
const SEQUENCE_TIME_BUCKET_SECS: i64 = 60;

/// What to do with a sequence number that does not fit its 4 symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceOverflow {
    /// Reduce modulo 32^4.
    #[default]
    Wrap,
    /// Fail with `ValueOutOfRange`.
    Reject,
}

impl FromStr for SequenceOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrap" => Ok(SequenceOverflow::Wrap),
            "reject" => Ok(SequenceOverflow::Reject),
            other => Err(format!(
                "unknown sequence overflow policy '{}': expected 'wrap' or 'reject'",
                other
            )),
        }
    }
}

// ============================================================================
// FIELD ENCODING
// ============================================================================

/// Deterministically map an arbitrary string into `[0, capacity)`.
///
/// First 8 bytes of SHA-256, big-endian, modulo `capacity`.
pub fn hash_to_capacity(raw: &str, capacity: u64) -> u64 {
    let digest = Sha256::digest(raw.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) % capacity.max(1)
}

/// Numeric value an identifier string is stored as in `field`.
///
/// Decimal strings of any length are treated as numbers; one that does not
/// fit in `u64` is reported as `u64::MAX`.
pub fn field_value(field: Field, raw: &str) -> Result<u64, CodeError> {
    if raw.is_empty() {
        return Err(CodeError::InvalidInput {
            field: field.name(),
            reason: "must not be empty".to_string(),
        });
    }

    let capacity = field.capacity();

    if let Some(digits) = raw.strip_prefix('-') {
        if is_decimal(digits) {
            return Err(CodeError::InvalidInput {
                field: field.name(),
                reason: format!("negative identifier {}", raw),
            });
        }
    }

    if is_decimal(raw) {
        let value = raw.parse::<u64>().unwrap_or(u64::MAX);
        if value >= capacity {
            return Err(CodeError::ValueOutOfRange {
                field: field.name(),
                value,
                capacity,
            });
        }
        return Ok(value);
    }

    let hashed = hash_to_capacity(raw, capacity);
    debug!(field = field.name(), hashed, "non-numeric identifier hashed into field");
    Ok(hashed)
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Pack a date as `YYYYMMDD` in decimal.
pub fn pack_date(date: NaiveDate) -> Result<u64, CodeError> {
    let year = date.year();
    let packed = year.max(0) as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CodeError::InvalidDate {
            packed,
            reason: format!("year {} outside {}..={}", year, MIN_YEAR, MAX_YEAR),
        });
    }
    Ok(packed)
}

fn sequence_value(sequence: i64, overflow: SequenceOverflow) -> Result<u64, CodeError> {
    let capacity = Field::Sequence.capacity();
    let value = u64::try_from(sequence).map_err(|_| CodeError::InvalidInput {
        field: Field::Sequence.name(),
        reason: format!("must be non-negative, got {}", sequence),
    })?;

    if value < capacity {
        return Ok(value);
    }

    match overflow {
        SequenceOverflow::Wrap => {
            let wrapped = value % capacity;
            debug!(sequence = value, wrapped, "sequence wrapped to field capacity");
            Ok(wrapped)
        }
        SequenceOverflow::Reject => Err(CodeError::ValueOutOfRange {
            field: Field::Sequence.name(),
            value,
            capacity,
        }),
    }
}

fn encode_field(field: Field, value: u64) -> Result<String, CodeError> {
    alphabet::encode(value, field.width()).map_err(|e| e.in_field(field.name()))
}

// ============================================================================
// GENERATE
// ============================================================================

/// Build a 24-symbol code, wrapping oversized sequence numbers.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
/// let code = ticket_code::generate("12345", date, "100", "500", 999).unwrap();
/// assert_eq!(code.len(), 24);
///
/// let record = ticket_code::decode(&code).unwrap();
/// assert_eq!(record.sequence, 999);
/// assert_eq!(record.event_date, date);
/// ```
pub fn generate(
    event_id: &str,
    event_date: NaiveDate,
    category_id: &str,
    seat_id: &str,
    sequence: i64,
) -> Result<String, CodeError> {
    generate_with(
        SequenceOverflow::Wrap,
        event_id,
        event_date,
        category_id,
        seat_id,
        sequence,
    )
}

/// Build a 24-symbol code with an explicit sequence overflow policy.
pub fn generate_with(
    overflow: SequenceOverflow,
    event_id: &str,
    event_date: NaiveDate,
    category_id: &str,
    seat_id: &str,
    sequence: i64,
) -> Result<String, CodeError> {
    // 1. Reject missing input before touching any field
    for (field, raw) in [
        (Field::EventId, event_id),
        (Field::Category, category_id),
        (Field::SeatId, seat_id),
    ] {
        if raw.is_empty() {
            return Err(CodeError::InvalidInput {
                field: field.name(),
                reason: "must not be empty".to_string(),
            });
        }
    }
    if sequence < 0 {
        return Err(CodeError::InvalidInput {
            field: Field::Sequence.name(),
            reason: format!("must be non-negative, got {}", sequence),
        });
    }

    // 2. Resolve each field to its integer
    let event = field_value(Field::EventId, event_id)?;
    let date = pack_date(event_date)?;
    let category = field_value(Field::Category, category_id)?;
    let seat = field_value(Field::SeatId, seat_id)?;
    let seq = sequence_value(sequence, overflow)?;

    // 3. Fixed-width concatenation in wire order
    let mut payload = String::with_capacity(CODE_LENGTH);
    for (field, value) in [
        (Field::EventId, event),
        (Field::EventDate, date),
        (Field::Category, category),
        (Field::SeatId, seat),
        (Field::Sequence, seq),
    ] {
        payload.push_str(&encode_field(field, value)?);
    }

    // 4. Checksum
    let code = checksum::append(&payload)?;
    trace!(code = %code, "generated ticket code");
    Ok(code)
}

/// Sequence number for a new code.
///
/// Adds the current minute since the epoch to 32 bits from the OS RNG and
/// reduces modulo the sequence capacity. Nothing is remembered between calls,
/// so two codes with the same other fields can still collide.
pub fn generate_sequence() -> u32 {
    let bucket = (Utc::now().timestamp() / SEQUENCE_TIME_BUCKET_SECS).max(0) as u64;
    let noise = OsRng.next_u32() as u64;
    (bucket.wrapping_add(noise) % Field::Sequence.capacity()) as u32
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Dashed, human-readable form: `XXXXX-XXXXX-XXX-XXXXX-XXXX-XX`.
///
/// Input that is not exactly 24 symbols after normalization is returned
/// normalized, without separators.
pub fn format(code: &str) -> String {
    let normalized = normalize(code);
    let symbols: Vec<char> = normalized.chars().collect();
    if symbols.len() != CODE_LENGTH {
        return normalized;
    }

    let segments: Vec<String> = Field::ALL
        .iter()
        .map(|field| symbols[field.range()].iter().collect())
        .collect();
    let separator = SEPARATOR.to_string();
    segments.join(separator.as_str())
}

/// Drop every separator. Inverse of [`format`] on a well-formed code.
pub fn remove_dashes(s: &str) -> String {
    s.chars().filter(|&c| c != SEPARATOR).collect()
}

// ============================================================================
// TESTS
// ============================================================================
