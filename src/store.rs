//! Saved terms, persisted as JSON.
//!
//! The list lives in `<dir>/saved_terms.json` as `[{"term", "explanation"}]`.
//! Newest entries come first and at most one entry exists per `term`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{RecordId, TermRecord};

/// Storage identifier; also the file stem.
pub const STORAGE_KEY: &str = "saved_terms";

/// User-curated list of term records.
///
/// # Example
///
/// ```no_run
/// use term_extractor::{SavedTermsStore, TermRecord};
///
/// # fn run() -> term_extractor::Result<()> {
/// let mut store = SavedTermsStore::open("/tmp/jargon")?;
/// store.save(TermRecord::new("LLM", "A large language model."))?;
/// assert!(store.is_saved(&TermRecord::new("LLM", "anything")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SavedTermsStore {
    path: PathBuf,
    terms: Vec<TermRecord>,
}

impl SavedTermsStore {
    /// Open the store in `dir`, loading any existing list.
    ///
    /// A missing file means an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty; it is overwritten on the next change.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", STORAGE_KEY));
        let terms = Self::load(&path);
        debug!(path = %path.display(), count = terms.len(), "opened saved terms");
        Ok(Self { path, terms })
    }

    fn load(path: &Path) -> Vec<TermRecord> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read saved terms");
                return Vec::new();
            }
        };
        serde_json::from_slice(&data).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "saved terms file is corrupt, starting empty");
            Vec::new()
        })
    }

    /// Save `record` at the front of the list.
    ///
    /// Returns `false` without touching the file if a record with the same
    /// `term` is already saved.
    pub fn save(&mut self, record: TermRecord) -> Result<bool> {
        if self.is_saved(&record) {
            return Ok(false);
        }
        self.terms.insert(0, record);
        self.persist()?;
        Ok(true)
    }

    /// Remove the record with this identity. Returns whether one was found.
    pub fn remove(&mut self, id: RecordId) -> Result<bool> {
        let before = self.terms.len();
        self.terms.retain(|r| r.id() != id);
        if self.terms.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn remove_all(&mut self) -> Result<()> {
        self.terms.clear();
        self.persist()
    }

    /// Whether a record with the same `term` is saved.
    pub fn is_saved(&self, record: &TermRecord) -> bool {
        self.terms.iter().any(|r| r.term() == record.term())
    }

    pub fn terms(&self) -> &[TermRecord] {
        &self.terms
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.terms)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
