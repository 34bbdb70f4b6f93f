//! File-backed key/value store.

use super::atomic_json::AtomicJsonFile;
use campus_core::storage::KeyValueStore;
use campus_core::{PortalError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

type Entries = BTreeMap<String, String>;

/// Local-storage emulation backed by a single JSON object on disk.
///
/// Every call re-reads the file, so two services pointed at the same path see
/// each other's writes (this is how a "page reload" is reproduced).
pub struct FileLocalStorage {
    file: AtomicJsonFile<Entries>,
}

impl FileLocalStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    fn write(&self, f: impl FnOnce(&mut Entries)) -> Result<()> {
        let mut f = Some(f);
        let result = self.file.update(Entries::new(), |entries| {
            if let Some(f) = f.take() {
                f(entries);
            }
            Ok(())
        });

        match result {
            Err(PortalError::Serialization { message, .. }) => {
                tracing::warn!(
                    "[LocalStorage] {} is unreadable, starting fresh: {}",
                    self.file.path().display(),
                    message
                );
                let mut entries = Entries::new();
                if let Some(f) = f.take() {
                    f(&mut entries);
                }
                self.file.save(&entries)
            }
            other => other,
        }
    }
}

impl KeyValueStore for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .file
            .load()?
            .and_then(|mut entries| entries.remove(key)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.write(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.write(|entries| {
            entries.remove(key);
        })
    }
}
