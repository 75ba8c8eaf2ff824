//! Person: the primary entity
//!
//! A person has no identity field. Whenever a ticket needs to point at a
//! person on disk, it uses the person's position in the owning collection
//! at the moment of saving.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A traveller
///
/// Equality is by value over every field; two persons with identical
/// details are the same person as far as the store is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    /// Full name
    pub name: String,
    /// Sex as entered by the user
    pub sex: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Place of birth
    pub birthplace: String,
    /// Nationality
    pub nationality: String,
    /// National identification number
    pub id_number: i32,
    /// Passport or ID card number
    pub document_number: String,
}

impl Person {
    /// Create a person from its parts
    pub fn new(
        name: impl Into<String>,
        sex: impl Into<String>,
        birth_date: NaiveDate,
        birthplace: impl Into<String>,
        nationality: impl Into<String>,
        id_number: i32,
        document_number: impl Into<String>,
    ) -> Self {
        Person {
            name: name.into(),
            sex: sex.into(),
            birth_date,
            birthplace: birthplace.into(),
            nationality: nationality.into(),
            id_number,
            document_number: document_number.into(),
        }
    }
}
