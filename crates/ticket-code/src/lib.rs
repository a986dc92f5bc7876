//! # ticket-code
//!
//! Fixed-length, human-typable ticket identifiers:
//!
//! ```text
//! C1S0Z-0Q8RS-034-G000F-M0Z7-XX
//! └─┬─┘ └─┬─┘ └┬┘ └─┬─┘ └┬─┘ └┤
//!  event  date cat  seat  seq  CRC-10
//! ```
//!
//! - **Alphabet**: 32 symbols without `I`, `L`, `O`, `U`; typos of those are
//!   repaired on input.
//! - **Checksum**: CRC-10 over the 5-bit symbol values, rendered as 2 symbols.
//!   Every single-symbol substitution is detected.
//! - **Layout**: five fixed-width fields plus checksum, 24 symbols in total.
//!
//! Everything here is a pure function. Codes are generated once and only ever
//! read afterwards.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ticket_code::{decode, format, generate, remove_dashes};
//!
//! let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
//! let code = generate("12345", date, "100", "500", 999).unwrap();
//!
//! let pretty = format(&code);
//! assert_eq!(pretty.len(), 29);
//! assert_eq!(remove_dashes(&pretty), code);
//!
//! let record = decode(&pretty).unwrap();
//! assert_eq!(record.event_id, "EVT00012345");
//! assert_eq!(record.event_date, date);
//! ```

pub mod alphabet;
pub mod checksum;
pub mod compose;
pub mod decompose;
pub mod error;
pub mod layout;

pub use alphabet::{
    decode as decode_symbols, encode, encode_compact, is_valid_char, normalize, ALPHABET,
};
pub use checksum::{append, checksum, extract, strip, validate};
pub use compose::{
    format, generate, generate_sequence, generate_with, remove_dashes, SequenceOverflow,
    MAX_YEAR, MIN_YEAR,
};
pub use decompose::{decode, extract_components, is_valid_format, CodeComponents, TicketRecord};
pub use error::{CodeError, ErrorKind};
pub use layout::{Field, CODE_LENGTH, FORMATTED_LENGTH};
