//! Travelog - record store for persons and their travel tickets
//!
//! Travelog keeps two in-memory collections, persons and the tickets that
//! belong to them, and persists each collection as a whole to one file in
//! one of three formats: packed binary, `;`-delimited text or an
//! object-graph stream.
//!
//! # Quick Start
//!
//! ```ignore
//! use travelog::{Person, RecordBook, Ticket};
//!
//! let mut book = RecordBook::open("./data")?;
//! book.load()?;
//!
//! book.persons_mut().add_or_update(jan.clone());
//! book.tickets_mut().add_or_update(Ticket::new(jan, details));
//! book.save()?;
//! ```
//!
//! # Architecture
//!
//! Tickets refer to persons on disk by the person's position in the person
//! collection. Persons must load before tickets, and both stores must be
//! saved together after persons are removed.

pub use travelog_core::{format_date, parse_date, Person, Ticket, TicketDetails, DATE_PATTERN};
pub use travelog_engine::{
    BookConfig, BookError, BookLoadReport, ConfigError, DataPaths, RecordBook, CONFIG_FILE_NAME,
};
pub use travelog_storage::{
    codec_for, Codec, CodecError, CodecKind, DanglingReference, Decoded, EntityStore, FieldError,
    LoadError, LoadReport, PersonStore, ReferencePolicy, ReferenceResolver, SaveError,
    SkippedRecord, TicketStore, NOT_FOUND,
};
