//! Entity store
//!
//! An `EntityStore` owns the in-memory collection of one entity kind and
//! drives whole-collection load and save through its codec.
//!
//! # Contract
//!
//! - The collection starts empty; `load` replaces it wholesale.
//! - `save` always writes the entire collection, never a delta.
//! - The order of [`EntityStore::get_all`] is the surrogate-key space that
//!   dependent stores reference, so callers only get a read-only view and
//!   mutate through [`EntityStore::add_or_update`] and [`EntityStore::remove`].
//! - Tickets must be loaded after persons, and saved against the same
//!   person collection that is being written.
//!
//! # Example
//!
//! ```ignore
//! use travelog_storage::{CodecKind, PersonStore, TicketStore};
//!
//! let mut persons = PersonStore::new(dir.join("Persons.dat"), CodecKind::Binary);
//! let mut tickets = TicketStore::new(dir.join("Tickets.obj"), CodecKind::Object);
//!
//! persons.load()?;
//! tickets.load(&persons)?;
//! // ...
//! persons.save()?;
//! tickets.save(&persons)?;
//! ```

use crate::codec::{codec_for, Codec, CodecKind};
use crate::entity::Entity;
use crate::error::{DanglingReference, LoadError, LoadReport, SaveError};
use crate::resolver::{ReferenceResolver, NOT_FOUND};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};
use travelog_core::{Person, Ticket};

/// What a load does with a stored reference that does not resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Keep the entity without a reference and report it
    #[default]
    Keep,
    /// Fail the load with [`LoadError::MissingReference`]
    Reject,
}

impl FromStr for ReferencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(ReferencePolicy::Keep),
            "reject" => Ok(ReferencePolicy::Reject),
            other => Err(format!(
                "Invalid reference policy '{}'. Expected \"keep\" or \"reject\".",
                other
            )),
        }
    }
}

/// In-memory collection of one entity kind backed by one file
pub struct EntityStore<E: Entity> {
    path: PathBuf,
    codec: Box<dyn Codec<E::Record>>,
    policy: ReferencePolicy,
    entities: Vec<E>,
}

/// Store of primary entities
pub type PersonStore = EntityStore<Person>;

/// Store of dependent entities
pub type TicketStore = EntityStore<Ticket>;

impl<E: Entity> EntityStore<E> {
    /// Create an empty store backed by `path` using the `kind` codec
    pub fn new(path: impl Into<PathBuf>, kind: CodecKind) -> Self {
        Self::with_codec(path, codec_for(kind))
    }

    /// Create an empty store with an explicit codec
    pub fn with_codec(path: impl Into<PathBuf>, codec: Box<dyn Codec<E::Record>>) -> Self {
        EntityStore {
            path: path.into(),
            codec,
            policy: ReferencePolicy::default(),
            entities: Vec::new(),
        }
    }

    /// Set how loads treat unresolvable references
    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Codec variant in use
    pub fn codec_kind(&self) -> CodecKind {
        self.codec.kind()
    }

    /// Reference policy in use
    pub fn reference_policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// All entities in insertion order
    pub fn get_all(&self) -> &[E] {
        &self.entities
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity at `index`, if in range
    pub fn get_by_index(&self, index: usize) -> Option<&E> {
        self.entities.get(index)
    }

    /// Position of the first value-equal entity
    pub fn index_of(&self, entity: &E) -> Option<usize> {
        self.entities.iter().position(|e| e == entity)
    }

    /// Insert `entity` unless a value-equal one is already present
    ///
    /// There is no in-place update: a modified copy of an existing entity is
    /// a different value and is appended. Returns whether it was inserted.
    pub fn add_or_update(&mut self, entity: E) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Remove the first value-equal entity
    pub fn remove(&mut self, entity: &E) -> Option<E> {
        let index = self.index_of(entity)?;
        Some(self.entities.remove(index))
    }

    /// Load the backing file, replacing the in-memory collection
    ///
    /// A missing file is created empty. On error the collection is left as
    /// it was.
    pub fn load_with(&mut self, ctx: &E::Context) -> Result<LoadReport, LoadError> {
        debug!(kind = E::NAME, path = %self.path.display(), codec = %self.codec_kind(), "Loading");

        ensure_storage(&self.path).map_err(|source| LoadError::NotFound {
            path: self.path.clone(),
            source,
        })?;

        let data = fs::read(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;

        if data.is_empty() {
            debug!(kind = E::NAME, path = %self.path.display(), "Storage file is empty");
            self.entities.clear();
            return Ok(LoadReport::empty(self.path.clone()));
        }

        let decoded = self
            .codec
            .decode(&data)
            .map_err(|source| LoadError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        for skipped in &decoded.skipped {
            warn!(
                kind = E::NAME,
                path = %self.path.display(),
                line = skipped.line,
                reason = %skipped.reason,
                "Skipping unreadable record"
            );
        }

        let mut entities = Vec::with_capacity(decoded.records.len());
        let mut dangling = Vec::new();
        for (index, record) in decoded.records.into_iter().enumerate() {
            let resolved = E::from_record(record, ctx);
            if let Some(key) = resolved.dangling_key {
                if self.policy == ReferencePolicy::Reject {
                    return Err(LoadError::MissingReference {
                        path: self.path.clone(),
                        index,
                        key,
                    });
                }
                warn!(
                    kind = E::NAME,
                    path = %self.path.display(),
                    index,
                    key,
                    "Stored reference does not resolve; keeping record without it"
                );
                dangling.push(DanglingReference { index, key });
            }
            entities.push(resolved.entity);
        }

        self.entities = entities;
        info!(
            kind = E::NAME,
            path = %self.path.display(),
            loaded = self.entities.len(),
            skipped = decoded.skipped.len(),
            dangling = dangling.len(),
            "Load complete"
        );

        Ok(LoadReport {
            path: self.path.clone(),
            loaded: self.entities.len(),
            skipped: decoded.skipped,
            dangling,
        })
    }

    /// Write the whole collection to the backing file
    ///
    /// The collection is encoded before the file is opened, so an encode
    /// failure leaves the previous contents in place. A failed write may
    /// leave a partial file.
    pub fn save_with(&self, ctx: &E::Context) -> Result<(), SaveError> {
        debug!(kind = E::NAME, path = %self.path.display(), codec = %self.codec_kind(), "Saving");

        let records: Vec<E::Record> = self.entities.iter().map(|e| e.to_record(ctx)).collect();
        let bytes = self
            .codec
            .encode(&records)
            .map_err(|source| SaveError::Encode {
                path: self.path.clone(),
                source,
            })?;

        write_storage(&self.path, &bytes).map_err(|source| SaveError::IoFailure {
            path: self.path.clone(),
            source,
        })?;

        info!(
            kind = E::NAME,
            path = %self.path.display(),
            saved = records.len(),
            bytes = bytes.len(),
            "Save complete"
        );
        Ok(())
    }
}

impl EntityStore<Person> {
    /// Load persons
    pub fn load(&mut self) -> Result<LoadReport, LoadError> {
        self.load_with(&())
    }

    /// Save persons
    pub fn save(&self) -> Result<(), SaveError> {
        self.save_with(&())
    }
}

impl EntityStore<Ticket> {
    /// Load tickets, resolving references against the loaded `persons`
    pub fn load(&mut self, persons: &PersonStore) -> Result<LoadReport, LoadError> {
        self.load_with(persons)
    }

    /// Save tickets, keyed by each person's current position in `persons`
    ///
    /// Tickets whose person is not in `persons` are saved with the
    /// [`NOT_FOUND`] key.
    pub fn save(&self, persons: &PersonStore) -> Result<(), SaveError> {
        let resolver = ReferenceResolver::new(persons);
        let unresolved = self
            .entities
            .iter()
            .filter(|t| resolver.key_for(t.belongs_to.as_ref()) == NOT_FOUND)
            .count();
        if unresolved > 0 {
            warn!(
                path = %self.path.display(),
                unresolved,
                "Saving tickets whose person is not in the person store"
            );
        }
        self.save_with(persons)
    }

    /// Tickets belonging to `person`, in store order
    pub fn tickets_for<'a, 'p>(
        &'a self,
        person: &'p Person,
    ) -> impl Iterator<Item = &'a Ticket> + 'p
    where
        'a: 'p,
    {
        self.entities.iter().filter(move |t| t.belongs_to(person))
    }
}

impl<E: Entity> fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &E::NAME)
            .field("path", &self.path)
            .field("codec", &self.codec_kind())
            .field("policy", &self.policy)
            .field("len", &self.entities.len())
            .finish()
    }
}

/// Create the file and its directory if they do not exist
fn ensure_storage(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Created storage file");
    }
    Ok(())
}

fn write_storage(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}
