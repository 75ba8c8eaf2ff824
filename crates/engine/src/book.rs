//! Record book: a data directory holding one person store and one ticket store
//!
//! ```ignore
//! let mut book = RecordBook::open("./data")?;
//! book.load()?;
//! book.persons_mut().add_or_update(person);
//! book.save()?;
//! ```
//!
//! Persons always load before tickets, and tickets always save against the
//! person collection being written in the same call, so the positional keys
//! stay consistent for a book that is only mutated through this type.

use crate::config::{BookConfig, ConfigError};
use crate::paths::DataPaths;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use travelog_core::{Person, Ticket};
use travelog_storage::{LoadError, LoadReport, PersonStore, SaveError, TicketStore};

/// Errors from opening, loading or saving a record book
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// The data directory could not be created
    #[error("Cannot create data directory {path}: {source}")]
    Directory {
        /// Data directory
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Reading or writing `travelog.toml` failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A store failed to load
    #[error("Loading {store} failed: {source}")]
    Load {
        /// Store name
        store: &'static str,
        /// Load failure
        #[source]
        source: LoadError,
    },

    /// A store failed to save
    #[error("Saving {store} failed: {source}")]
    Save {
        /// Store name
        store: &'static str,
        /// Save failure
        #[source]
        source: SaveError,
    },
}

/// Outcome of [`RecordBook::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLoadReport {
    /// Person store report
    pub persons: LoadReport,
    /// Ticket store report
    pub tickets: LoadReport,
}

impl BookLoadReport {
    /// True if neither store skipped a line or left a reference dangling
    pub fn is_clean(&self) -> bool {
        self.persons.is_clean() && self.tickets.is_clean()
    }
}

/// Persons and their tickets under one data directory
#[derive(Debug)]
pub struct RecordBook {
    paths: DataPaths,
    config: BookConfig,
    persons: PersonStore,
    tickets: TicketStore,
}

impl RecordBook {
    /// Open a record book, creating the directory and a default
    /// `travelog.toml` when missing.
    ///
    /// Stores start empty; call [`RecordBook::load`] to read them.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, BookError> {
        let paths = DataPaths::from_root(data_dir);
        create_root(&paths)?;

        let config_path = paths.config();
        BookConfig::write_default_if_missing(&config_path)?;
        let config = BookConfig::from_file(&config_path)?;

        Self::build(paths, config)
    }

    /// Open a record book with an explicit configuration.
    ///
    /// `travelog.toml` is neither read nor written.
    pub fn open_with_config(
        data_dir: impl AsRef<Path>,
        config: BookConfig,
    ) -> Result<Self, BookError> {
        let paths = DataPaths::from_root(data_dir);
        create_root(&paths)?;
        Self::build(paths, config)
    }

    fn build(paths: DataPaths, config: BookConfig) -> Result<Self, BookError> {
        let persons = PersonStore::new(
            paths.persons_file(config.persons_format),
            config.persons_format,
        );
        let tickets = TicketStore::new(
            paths.tickets_file(config.tickets_format),
            config.tickets_format,
        )
        .with_reference_policy(config.dangling_references);

        debug!(
            root = %paths.root().display(),
            persons = %config.persons_format,
            tickets = %config.tickets_format,
            "Opened record book"
        );

        Ok(RecordBook {
            paths,
            config,
            persons,
            tickets,
        })
    }

    /// Load persons, then tickets against the loaded persons.
    pub fn load(&mut self) -> Result<BookLoadReport, BookError> {
        let persons = self.persons.load().map_err(|source| BookError::Load {
            store: "persons",
            source,
        })?;
        let tickets = self
            .tickets
            .load(&self.persons)
            .map_err(|source| BookError::Load {
                store: "tickets",
                source,
            })?;

        info!(
            root = %self.paths.root().display(),
            persons = persons.loaded,
            tickets = tickets.loaded,
            "Loaded record book"
        );
        Ok(BookLoadReport { persons, tickets })
    }

    /// Save persons, then tickets keyed against the same persons.
    pub fn save(&self) -> Result<(), BookError> {
        self.persons.save().map_err(|source| BookError::Save {
            store: "persons",
            source,
        })?;
        self.tickets
            .save(&self.persons)
            .map_err(|source| BookError::Save {
                store: "tickets",
                source,
            })
    }

    /// Person store
    pub fn persons(&self) -> &PersonStore {
        &self.persons
    }

    /// Ticket store
    pub fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    /// Mutable person store
    ///
    /// Removing or reordering persons after tickets were saved shifts the
    /// keys those tickets were stored with; save both stores together.
    pub fn persons_mut(&mut self) -> &mut PersonStore {
        &mut self.persons
    }

    /// Mutable ticket store
    pub fn tickets_mut(&mut self) -> &mut TicketStore {
        &mut self.tickets
    }

    /// Tickets belonging to `person`
    pub fn tickets_for<'a, 'p>(
        &'a self,
        person: &'p Person,
    ) -> impl Iterator<Item = &'a Ticket> + 'p
    where
        'a: 'p,
    {
        self.tickets.tickets_for(person)
    }

    /// Active configuration
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Data directory layout
    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }
}

fn create_root(paths: &DataPaths) -> Result<(), BookError> {
    paths
        .create_directories()
        .map_err(|source| BookError::Directory {
            path: paths.root().to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use travelog_core::TicketDetails;
    use travelog_storage::{CodecKind, ReferencePolicy};

    fn person(name: &str) -> Person {
        Person::new(
            name,
            "M",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            "Amsterdam",
            "Dutch",
            123456789,
            "NL1234567",
        )
    }

    fn details(destination: &str) -> TicketDetails {
        let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        TicketDetails::new(destination, day, day, 99.0, true, "")
    }

    #[test]
    fn test_open_writes_default_config() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("book");
        let book = RecordBook::open(&root).unwrap();

        assert!(root.join("travelog.toml").exists());
        assert_eq!(*book.config(), BookConfig::default());
        assert_eq!(book.persons().path(), root.join("Persons.dat"));
        assert_eq!(book.tickets().path(), root.join("Tickets.obj"));
        assert!(book.persons().is_empty());
    }

    #[test]
    fn test_open_reads_existing_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("travelog.toml"),
            "persons_format = \"text\"\ndangling_references = \"reject\"\n",
        )
        .unwrap();

        let book = RecordBook::open(dir.path()).unwrap();
        assert_eq!(book.persons().codec_kind(), CodecKind::Text);
        assert_eq!(book.tickets().codec_kind(), CodecKind::Object);
        assert_eq!(book.tickets().reference_policy(), ReferencePolicy::Reject);
    }

    #[test]
    fn test_open_with_bad_config_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("travelog.toml"), "tickets_format = 3\n").unwrap();

        let err = RecordBook::open(dir.path()).unwrap_err();
        assert!(matches!(err, BookError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_open_with_config_skips_config_file() {
        let dir = TempDir::new().unwrap();
        let book =
            RecordBook::open_with_config(dir.path(), BookConfig::uniform(CodecKind::Text)).unwrap();

        assert!(!dir.path().join("travelog.toml").exists());
        assert_eq!(book.tickets().path(), dir.path().join("Tickets.txt"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut book = RecordBook::open(dir.path()).unwrap();
        let jan = person("Jan de Boer");
        book.persons_mut().add_or_update(jan.clone());
        book.tickets_mut()
            .add_or_update(Ticket::new(jan.clone(), details("Lisbon")));
        book.save().unwrap();

        let mut reopened = RecordBook::open(dir.path()).unwrap();
        let report = reopened.load().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.persons.loaded, 1);
        assert_eq!(report.tickets.loaded, 1);
        assert_eq!(reopened.tickets_for(&jan).count(), 1);
    }

    #[test]
    fn test_load_error_names_store() {
        let dir = TempDir::new().unwrap();
        let book = RecordBook::open(dir.path()).unwrap();
        std::fs::write(book.tickets().path(), 0i32.to_be_bytes()).unwrap();

        let mut book = book;
        let err = book.load().unwrap_err();
        match &err {
            BookError::Load { store, .. } => assert_eq!(*store, "tickets"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("tickets"));
    }
}
