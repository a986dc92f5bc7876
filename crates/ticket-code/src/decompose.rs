//! Decoding ticket codes back into their fields.
//!
//! The pipeline is strictly ordered and stops at the first failure:
//!
//! 1. normalize
//! 2. length must be 24
//! 3. checksum must match (before any field is interpreted)
//! 4. split into segments
//! 5. decode each segment
//! 6. rebuild and check the event date
//!
//! A code that fails step 3 never produces field values.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::alphabet::{self, normalize};
use crate::checksum;
use crate::compose::{MAX_YEAR, MIN_YEAR};
use crate::error::CodeError;
use crate::layout::{Field, CODE_LENGTH};

/// Fully decoded and validated ticket code.
///
/// Identifier fields are returned as placeholders (`EVT00012345`) alongside
/// their numeric value; the original strings are not recoverable when they
/// were hashed at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRecord {
    pub event_id: String,
    pub event_number: u64,
    pub event_date: NaiveDate,
    pub category_id: String,
    pub category_number: u64,
    pub seat_id: String,
    pub seat_number: u64,
    pub sequence: u32,
    /// Normalized 24-symbol code.
    pub encoded_id: String,
    pub checksum: String,
}

/// Raw segments of a code, not checksum-verified. For diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeComponents {
    pub event_id: String,
    pub event_date: String,
    pub category: String,
    pub seat_id: String,
    pub sequence: String,
    pub checksum: String,
}

impl CodeComponents {
    pub fn segment(&self, field: Field) -> &str {
        match field {
            Field::EventId => &self.event_id,
            Field::EventDate => &self.event_date,
            Field::Category => &self.category,
            Field::SeatId => &self.seat_id,
            Field::Sequence => &self.sequence,
            Field::Checksum => &self.checksum,
        }
    }

    /// Map view keyed by field name, for inspection tools.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        Field::ALL
            .iter()
            .map(|field| (field.name(), self.segment(*field).to_string()))
            .collect()
    }
}

/// `EVT00012345`-style label for an identifier field.
pub fn placeholder(field: Field, value: u64) -> String {
    let prefix = field.placeholder_prefix().unwrap_or("");
    format!("{}{:0width$}", prefix, value, width = field.decimal_width())
}

// ============================================================================
// SEGMENTS
// ============================================================================

fn checked_symbols(code: &str) -> Result<(String, Vec<char>), CodeError> {
    let normalized = normalize(code);
    let symbols: Vec<char> = normalized.chars().collect();
    if symbols.len() != CODE_LENGTH {
        return Err(CodeError::InvalidLength {
            expected: CODE_LENGTH,
            actual: symbols.len(),
        });
    }
    Ok((normalized, symbols))
}

fn split(symbols: &[char]) -> CodeComponents {
    let seg = |field: Field| -> String { symbols[field.range()].iter().collect() };
    CodeComponents {
        event_id: seg(Field::EventId),
        event_date: seg(Field::EventDate),
        category: seg(Field::Category),
        seat_id: seg(Field::SeatId),
        sequence: seg(Field::Sequence),
        checksum: seg(Field::Checksum),
    }
}

/// Normalize, check the length and split. No checksum or date validation.
pub fn extract_components(code: &str) -> Result<CodeComponents, CodeError> {
    let (_, symbols) = checked_symbols(code)?;
    Ok(split(&symbols))
}

// ============================================================================
// DATE
// ============================================================================

/// Rebuild a calendar date from its `YYYYMMDD` packing.
pub fn unpack_date(packed: u64) -> Result<NaiveDate, CodeError> {
    let invalid = |reason: String| CodeError::InvalidDate { packed, reason };

    let year = packed / 10_000;
    let month = (packed / 100) % 100;
    let day = packed % 100;

    if year < MIN_YEAR as u64 || year > MAX_YEAR as u64 {
        return Err(invalid(format!(
            "year {} outside {}..={}",
            year, MIN_YEAR, MAX_YEAR
        )));
    }
    if !(1..=12).contains(&month) {
        return Err(invalid(format!("month {} outside 1..=12", month)));
    }
    if !(1..=31).contains(&day) {
        return Err(invalid(format!("day {} outside 1..=31", day)));
    }

    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .ok_or_else(|| invalid(format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day)))?;

    // Round-trip through the calendar catches e.g. day 30 of February.
    if date.year() as u64 != year || date.month() as u64 != month || date.day() as u64 != day {
        return Err(invalid(format!(
            "{:04}-{:02}-{:02} is not a calendar date",
            year, month, day
        )));
    }
    Ok(date)
}

// ============================================================================
// DECODE
// ============================================================================

/// Decode and fully validate a ticket code.
pub fn decode(code: &str) -> Result<TicketRecord, CodeError> {
    // 1-2. Normalize and check length
    let (normalized, symbols) = checked_symbols(code).map_err(|e| {
        debug!(error = %e, "rejected ticket code");
        e
    })?;

    // 3. Checksum before anything is interpreted
    let parts = split(&symbols);
    let payload: String = symbols[..Field::Checksum.offset()].iter().collect();
    let expected = checksum::checksum(&payload)?;
    if expected != parts.checksum {
        debug!(expected = %expected, actual = %parts.checksum, "ticket checksum mismatch");
        return Err(CodeError::InvalidChecksum {
            expected,
            actual: parts.checksum,
        });
    }

    // 4-5. Decode segments
    let value = |field: Field| -> Result<u64, CodeError> {
        alphabet::decode(parts.segment(field)).map_err(|e| match e {
            CodeError::DecodeFailure { position, reason } => CodeError::DecodeFailure {
                position: field.offset() + position,
                reason,
            },
            other => other,
        })
    };
    let event_number = value(Field::EventId)?;
    let packed_date = value(Field::EventDate)?;
    let category_number = value(Field::Category)?;
    let seat_number = value(Field::SeatId)?;
    let sequence = value(Field::Sequence)?;

    // 6. Date
    let event_date = unpack_date(packed_date)?;

    Ok(TicketRecord {
        event_id: placeholder(Field::EventId, event_number),
        event_number,
        event_date,
        category_id: placeholder(Field::Category, category_number),
        category_number,
        seat_id: placeholder(Field::SeatId, seat_number),
        seat_number,
        // 4 symbols are at most 20 bits
        sequence: sequence as u32,
        encoded_id: normalized,
        checksum: parts.checksum,
    })
}

/// Length, alphabet and checksum check without interpreting any field.
pub fn is_valid_format(code: &str) -> bool {
    let normalized = normalize(code);
    normalized.chars().count() == CODE_LENGTH
        && normalized.chars().all(|c| alphabet::symbol_value(c).is_some())
        && checksum::validate(&normalized)
}

// ============================================================================
// TESTS
// ============================================================================
