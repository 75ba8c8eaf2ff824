//! Core types for Travelog
//!
//! This crate defines the plain data records shared by every other crate:
//! - Person: the primary entity, referenced by tickets
//! - Ticket / TicketDetails: the dependent entity and its payload fields
//! - date_format: the canonical on-disk date rule used by all file formats

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod date_format;
pub mod person;
pub mod ticket;

pub use date_format::{format_date, parse_date, DATE_PATTERN};
pub use person::Person;
pub use ticket::{Ticket, TicketDetails};
