//! Canonical date format
//!
//! Every file format writes dates the same way so that a binary file and a
//! text file stay readable side by side, even though neither codec can
//! decode the other's output.

use chrono::{NaiveDate, ParseError};

/// Human-readable form of the on-disk date pattern
pub const DATE_PATTERN: &str = "dd-MM-yyyy";

/// The same pattern in `chrono` strftime syntax
const CHRONO_PATTERN: &str = "%d-%m-%Y";

/// Format a date as `dd-MM-yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format(CHRONO_PATTERN).to_string()
}

/// Parse a `dd-MM-yyyy` date
pub fn parse_date(text: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(text, CHRONO_PATTERN)
}
