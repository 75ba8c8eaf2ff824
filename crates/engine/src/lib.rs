//! Record book engine for Travelog
//!
//! This crate ties the storage layer to a data directory:
//! - RecordBook: open, load and save a person store and a ticket store together
//! - BookConfig: per-store codec and dangling-reference policy from `travelog.toml`
//! - DataPaths: where each file lives inside the data directory

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod config;
pub mod paths;

pub use book::{BookError, BookLoadReport, RecordBook};
pub use config::{BookConfig, ConfigError, CONFIG_FILE_NAME};
pub use paths::DataPaths;
