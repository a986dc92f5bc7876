//! Fixed layout of the 24-symbol ticket code.
//!
//! ```text
//! offset  0     5     10  13    18   22 24
//!         |EVENT|DATE |CAT|SEAT |SEQ |CK|
//!          5     5     3   5     4    2
//! ```
//!
//! Widths and order are part of the wire format. Changing either changes the
//! meaning of every code already issued.

use std::ops::Range;

use serde::Serialize;

use crate::alphabet::BASE;

/// Total symbols in a code.
pub const CODE_LENGTH: usize = 24;

/// Symbols covered by the checksum.
pub const PAYLOAD_LENGTH: usize = CODE_LENGTH - Field::Checksum.width();

/// Separator inserted by [`crate::format`].
pub const SEPARATOR: char = '-';

/// Length of the dashed, human-readable form.
pub const FORMATTED_LENGTH: usize = CODE_LENGTH + Field::ALL.len() - 1;

/// One segment of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EventId,
    EventDate,
    Category,
    SeatId,
    Sequence,
    Checksum,
}

impl Field {
    /// All segments in wire order.
    pub const ALL: [Field; 6] = [
        Field::EventId,
        Field::EventDate,
        Field::Category,
        Field::SeatId,
        Field::Sequence,
        Field::Checksum,
    ];

    pub const fn width(&self) -> usize {
        match self {
            Field::EventId => 5,
            Field::EventDate => 5,
            Field::Category => 3,
            Field::SeatId => 5,
            Field::Sequence => 4,
            Field::Checksum => 2,
        }
    }

    pub const fn offset(&self) -> usize {
        match self {
            Field::EventId => 0,
            Field::EventDate => 5,
            Field::Category => 10,
            Field::SeatId => 13,
            Field::Sequence => 18,
            Field::Checksum => 22,
        }
    }

    /// Symbol range of this segment inside a normalized code.
    pub const fn range(&self) -> Range<usize> {
        self.offset()..self.offset() + self.width()
    }

    /// Number of values the segment holds (32^width).
    pub const fn capacity(&self) -> u64 {
        BASE.pow(self.width() as u32)
    }

    /// Name used in error details and diagnostic maps.
    pub const fn name(&self) -> &'static str {
        match self {
            Field::EventId => "event_id",
            Field::EventDate => "event_date",
            Field::Category => "category_id",
            Field::SeatId => "seat_id",
            Field::Sequence => "sequence",
            Field::Checksum => "checksum",
        }
    }

    /// Prefix of the decoded placeholder for identifier fields.
    pub const fn placeholder_prefix(&self) -> Option<&'static str> {
        match self {
            Field::EventId => Some("EVT"),
            Field::Category => Some("CAT"),
            Field::SeatId => Some("SEAT"),
            _ => None,
        }
    }

    /// Decimal digits needed for the largest value of the segment.
    pub fn decimal_width(&self) -> usize {
        (self.capacity() - 1).to_string().len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
