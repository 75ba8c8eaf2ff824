//! Field layouts of the stored record types
//!
//! Both record types support every codec variant. Field order is the same
//! in the binary and text layouts:
//!
//! | Record | Fields |
//! |---|---|
//! | `Person` | name, sex, birth date, birthplace, nationality, id number, document number |
//! | `TicketRecord` | person key, destination, start and end date, cost, checked in, description |

mod person;
mod ticket;

use crate::codec::FieldError;
use chrono::NaiveDate;
use travelog_core::{parse_date, DATE_PATTERN};

pub(crate) fn text_date(field: &'static str, value: &str) -> Result<NaiveDate, FieldError> {
    parse_date(value)
        .map_err(|e| FieldError::new(field, format!("{:?} is not {}: {}", value, DATE_PATTERN, e)))
}
