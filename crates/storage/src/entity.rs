//! Mapping between in-memory entities and stored records
//!
//! Persons are stored as they are. Tickets hold a copy of their person in
//! memory but are stored as a [`TicketRecord`], with the person replaced by
//! its positional surrogate key in the person store.

use crate::codec::{BinaryFormat, ObjectFormat, TextFormat};
use crate::resolver::{ReferenceResolver, NOT_FOUND};
use crate::store::PersonStore;
use std::fmt;
use travelog_core::{Person, Ticket, TicketDetails};

/// An entity kind an [`EntityStore`](crate::store::EntityStore) can hold
pub trait Entity: Clone + PartialEq + fmt::Debug {
    /// On-disk form, supported by every codec variant
    type Record: BinaryFormat + TextFormat + ObjectFormat + 'static;

    /// What is needed to translate references on save and load
    type Context: ?Sized;

    /// Name used in log fields
    const NAME: &'static str;

    /// Build the stored record
    fn to_record(&self, ctx: &Self::Context) -> Self::Record;

    /// Rebuild the entity from a stored record
    fn from_record(record: Self::Record, ctx: &Self::Context) -> Resolved<Self>;
}

/// An entity rebuilt from storage
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<E> {
    /// The entity
    pub entity: E,
    /// The stored key, when it did not resolve to a live entity
    pub dangling_key: Option<i32>,
}

impl<E> Resolved<E> {
    /// An entity with nothing left unresolved
    pub fn complete(entity: E) -> Self {
        Resolved {
            entity,
            dangling_key: None,
        }
    }
}

/// Stored form of a ticket
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRecord {
    /// Position of the owning person at save time, or `NOT_FOUND`
    pub belongs_to: i32,
    /// Remaining ticket fields
    pub details: TicketDetails,
}

impl Entity for Person {
    type Record = Person;
    type Context = ();

    const NAME: &'static str = "person";

    fn to_record(&self, _ctx: &()) -> Person {
        self.clone()
    }

    fn from_record(record: Person, _ctx: &()) -> Resolved<Self> {
        Resolved::complete(record)
    }
}

impl Entity for Ticket {
    type Record = TicketRecord;
    type Context = PersonStore;

    const NAME: &'static str = "ticket";

    fn to_record(&self, persons: &PersonStore) -> TicketRecord {
        TicketRecord {
            belongs_to: ReferenceResolver::new(persons).key_for(self.belongs_to.as_ref()),
            details: self.details.clone(),
        }
    }

    fn from_record(record: TicketRecord, persons: &PersonStore) -> Resolved<Self> {
        match ReferenceResolver::new(persons).from_surrogate(record.belongs_to) {
            Some(person) => Resolved::complete(Ticket::new(person.clone(), record.details)),
            None if record.belongs_to == NOT_FOUND => {
                Resolved::complete(Ticket::unowned(record.details))
            }
            None => Resolved {
                entity: Ticket::unowned(record.details),
                dangling_key: Some(record.belongs_to),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(name: &str) -> Person {
        Person::new(name, "M", date(1970, 3, 3), "Delft", "Dutch", 1, "D1")
    }

    fn details() -> TicketDetails {
        TicketDetails::new("Berlin", date(2024, 1, 1), date(2024, 1, 3), 89.0, false, "")
    }

    fn persons(names: &[&str]) -> PersonStore {
        let mut store = PersonStore::new("unused.dat", CodecKind::Binary);
        for name in names {
            store.add_or_update(person(name));
        }
        store
    }

    #[test]
    fn test_ticket_record_uses_position() {
        let store = persons(&["a", "b", "c"]);
        let ticket = Ticket::new(person("c"), details());
        assert_eq!(ticket.to_record(&store).belongs_to, 2);
    }

    #[test]
    fn test_unknown_person_is_stored_as_sentinel() {
        let store = persons(&["a"]);
        let ticket = Ticket::new(person("z"), details());
        assert_eq!(ticket.to_record(&store).belongs_to, NOT_FOUND);

        let unowned = Ticket::unowned(details());
        assert_eq!(unowned.to_record(&store).belongs_to, NOT_FOUND);
    }

    #[test]
    fn test_record_resolves_back_to_person() {
        let store = persons(&["a", "b"]);
        let record = TicketRecord {
            belongs_to: 1,
            details: details(),
        };
        let resolved = Ticket::from_record(record, &store);
        assert_eq!(resolved.dangling_key, None);
        assert!(resolved.entity.belongs_to(&person("b")));
    }

    #[test]
    fn test_out_of_range_key_is_dangling() {
        let store = persons(&["a"]);
        let record = TicketRecord {
            belongs_to: 4,
            details: details(),
        };
        let resolved = Ticket::from_record(record, &store);
        assert_eq!(resolved.dangling_key, Some(4));
        assert!(resolved.entity.belongs_to.is_none());
        assert_eq!(resolved.entity.details, details());
    }

    #[test]
    fn test_not_found_key_is_unowned_not_dangling() {
        let store = persons(&["a"]);
        let record = TicketRecord {
            belongs_to: NOT_FOUND,
            details: details(),
        };
        let resolved = Ticket::from_record(record, &store);
        assert_eq!(resolved.dangling_key, None);
        assert!(resolved.entity.belongs_to.is_none());
    }
}
