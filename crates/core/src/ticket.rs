//! Ticket: the dependent entity
//!
//! A ticket belongs to one person. In memory the reference is a copy of the
//! person; it is `None` when the person could not be resolved on load.

use crate::person::Person;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything about a ticket except who it belongs to
///
/// This is the payload the object-graph format serializes; the reference is
/// always written separately as a surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// Travel destination
    pub destination: String,
    /// First day of travel
    pub start_date: NaiveDate,
    /// Last day of travel (not checked against `start_date`)
    pub end_date: NaiveDate,
    /// Price, non-negative by convention
    pub cost: f64,
    /// Whether the traveller has checked in
    pub checked_in: bool,
    /// Free-text notes
    pub description: String,
}

impl TicketDetails {
    /// Create ticket details from their parts
    pub fn new(
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        cost: f64,
        checked_in: bool,
        description: impl Into<String>,
    ) -> Self {
        TicketDetails {
            destination: destination.into(),
            start_date,
            end_date,
            cost,
            checked_in,
            description: description.into(),
        }
    }
}

/// A travel ticket
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    /// The person this ticket belongs to, `None` for a dangling reference
    pub belongs_to: Option<Person>,
    /// Remaining ticket fields
    pub details: TicketDetails,
}

impl Ticket {
    /// Create a ticket owned by `person`
    pub fn new(person: Person, details: TicketDetails) -> Self {
        Ticket {
            belongs_to: Some(person),
            details,
        }
    }

    /// Create a ticket whose owner is unknown
    pub fn unowned(details: TicketDetails) -> Self {
        Ticket {
            belongs_to: None,
            details,
        }
    }

    /// Whether this ticket belongs to `person`
    pub fn belongs_to(&self, person: &Person) -> bool {
        self.belongs_to.as_ref() == Some(person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(name: &str) -> Person {
        Person::new(name, "F", date(1985, 6, 15), "Utrecht", "Dutch", 42, "NL42")
    }

    fn details() -> TicketDetails {
        TicketDetails::new("Lisbon", date(2024, 5, 1), date(2024, 5, 8), 249.99, false, "")
    }

    #[test]
    fn test_belongs_to() {
        let ticket = Ticket::new(person("Anna"), details());
        assert!(ticket.belongs_to(&person("Anna")));
        assert!(!ticket.belongs_to(&person("Bram")));
    }

    #[test]
    fn test_unowned_belongs_to_nobody() {
        let ticket = Ticket::unowned(details());
        assert!(ticket.belongs_to.is_none());
        assert!(!ticket.belongs_to(&person("Anna")));
    }

    #[test]
    fn test_end_before_start_is_allowed() {
        let details =
            TicketDetails::new("Oslo", date(2024, 5, 8), date(2024, 5, 1), 0.0, true, "x");
        assert!(details.end_date < details.start_date);
    }
}
