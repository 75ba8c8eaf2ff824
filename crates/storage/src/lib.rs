//! Persistence layer for Travelog
//!
//! This crate provides:
//! - Codec: the record codec contract and its binary, text and object-graph variants
//! - Field layouts of the stored person and ticket records
//! - ReferenceResolver: positional surrogate keys for ticket-to-person references
//! - EntityStore: in-memory collections with whole-collection load and save
//! - LoadError / SaveError / LoadReport: the load and save outcome types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod entity;
pub mod error;
mod format;
pub mod resolver;
pub mod store;

pub use codec::{codec_for, Codec, CodecError, CodecKind, Decoded, FieldError, SkippedRecord};
pub use entity::{Entity, Resolved, TicketRecord};
pub use error::{DanglingReference, LoadError, LoadReport, SaveError};
pub use resolver::{ReferenceResolver, NOT_FOUND};
pub use store::{EntityStore, PersonStore, ReferencePolicy, TicketStore};
