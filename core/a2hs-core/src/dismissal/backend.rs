//! Key/value backends for dismissal records.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "a2hs-dismissed": { "dismissed": true, "scope": "permanent", "dismissed_at": "..." }
//!   }
//! }
//! ```
//!
//! Empty, corrupt, or unknown-version files load as empty. Writes go through a
//! temp file + rename so a crash never leaves a half-written file.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use super::store::DismissalRecord;
use crate::error::{A2hsError, Result};

const FILE_VERSION: u32 = 1;

/// Storage for dismissal records, keyed by the scope's fixed key.
pub trait DismissalBackend {
    fn read(&self, key: &str) -> Result<Option<DismissalRecord>>;
    fn write(&self, key: &str, record: &DismissalRecord) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-memory backend. Lives as long as the browsing session; clones share entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Rc<RefCell<HashMap<String, DismissalRecord>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DismissalBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<DismissalRecord>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, record: &DismissalRecord) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), record.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Backend that always fails, as storage does in restricted privacy modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl DismissalBackend for UnavailableBackend {
    fn read(&self, _key: &str) -> Result<Option<DismissalRecord>> {
        Err(A2hsError::StorageUnavailable("storage disabled".to_string()))
    }

    fn write(&self, _key: &str, _record: &DismissalRecord) -> Result<()> {
        Err(A2hsError::StorageUnavailable("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(A2hsError::StorageUnavailable("storage disabled".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DismissalFile {
    version: u32,
    #[serde(default)]
    entries: HashMap<String, DismissalRecord>,
}

impl Default for DismissalFile {
    fn default() -> Self {
        DismissalFile {
            version: FILE_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// JSON-file backend for the permanent scope.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<DismissalFile> {
        let content = match fs_err::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DismissalFile::default())
            }
            Err(err) => return Err(A2hsError::io("reading dismissal file", err)),
        };

        if content.trim().is_empty() {
            return Ok(DismissalFile::default());
        }

        match serde_json::from_str::<DismissalFile>(&content) {
            Ok(file) if file.version == FILE_VERSION => Ok(file),
            Ok(file) => {
                warn!(
                    version = file.version,
                    expected = FILE_VERSION,
                    path = %self.path.display(),
                    "Unsupported dismissal file version, treating as empty"
                );
                Ok(DismissalFile::default())
            }
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "Corrupt dismissal file, treating as empty");
                Ok(DismissalFile::default())
            }
        }
    }

    fn save(&self, file: &DismissalFile) -> Result<()> {
        let parent_dir = self.path.parent().ok_or_else(|| {
            A2hsError::StorageUnavailable("dismissal file path has no parent directory".to_string())
        })?;
        fs_err::create_dir_all(parent_dir)
            .map_err(|e| A2hsError::io("creating dismissal directory", e))?;

        let content = serde_json::to_string_pretty(file)
            .map_err(|e| A2hsError::json("serializing dismissal file", e))?;

        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| A2hsError::io("creating temp dismissal file", e))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| A2hsError::io("writing temp dismissal file", e))?;
        temp_file
            .flush()
            .map_err(|e| A2hsError::io("flushing temp dismissal file", e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| A2hsError::io("committing dismissal file", e.error))?;
        Ok(())
    }
}

impl DismissalBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<DismissalRecord>> {
        Ok(self.load()?.entries.remove(key))
    }

    fn write(&self, key: &str, record: &DismissalRecord) -> Result<()> {
        let mut file = self.load()?;
        file.entries.insert(key.to_string(), record.clone());
        self.save(&file)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut file = self.load()?;
        if file.entries.remove(key).is_some() {
            self.save(&file)?;
        }
        Ok(())
    }
}
