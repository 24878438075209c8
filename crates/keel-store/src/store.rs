//! File-backed persistence adapter.
//!
//! Three logical keys live as files under one root directory. Writes go
//! through a temp file plus rename so a partially written value is never
//! visible, with a mutex serializing writers.

use crate::error::StoreError;
use crate::vault;
use keel_core::{DecisionRecord, Principle};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Principle set file name.
const PRINCIPLES_FILE: &str = "principles.json";
/// Decision history file name.
const DECISIONS_FILE: &str = "decisions.json";
/// Obfuscated credential file name.
const CREDENTIAL_FILE: &str = "credential.txt";

/// File-backed store for principles, decision history, and the credential.
///
/// The public `load_*`/`save_*` methods are fail-soft per the adapter
/// contract: a failed load degrades to absent/empty and a failed save is a
/// logged no-op. The `try_*` variants expose the underlying errors.
#[derive(Debug)]
pub struct FileStore {
    /// Root directory for all store files.
    root: PathBuf,
    /// Serialize write access to the store files.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Replace a file's contents atomically (temp file + rename).
    fn write_atomic(&self, name: &str, contents: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let path = self.path(name);
        let temp_path = self.root.join(format!("{name}.tmp"));
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(contents.as_bytes())?;
        }
        fs::rename(&temp_path, &path)?;
        debug!("wrote store file (name={name}, bytes={})", contents.len());
        Ok(())
    }

    /// Read a file, distinguishing "absent" from an IO failure.
    fn read_optional(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Load the principle set, `None` when never saved.
    pub fn try_load_principles(&self) -> Result<Option<Vec<Principle>>, StoreError> {
        let Some(contents) = self.read_optional(PRINCIPLES_FILE)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Persist the principle set.
    pub fn try_save_principles(&self, principles: &[Principle]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(principles)?;
        self.write_atomic(PRINCIPLES_FILE, &contents)
    }

    /// Load the decision history, empty when never saved.
    pub fn try_load_decisions(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        let Some(contents) = self.read_optional(DECISIONS_FILE)? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist the decision history in its given order (most recent first).
    pub fn try_save_decisions(&self, decisions: &[DecisionRecord]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(decisions)?;
        self.write_atomic(DECISIONS_FILE, &contents)
    }

    /// Load and reveal the credential, `None` when absent or unusable.
    pub fn try_load_credential(&self) -> Result<Option<String>, StoreError> {
        let Some(token) = self.read_optional(CREDENTIAL_FILE)? else {
            return Ok(None);
        };
        let secret = vault::reveal(&token);
        if secret.is_empty() {
            warn!("stored credential token is unusable, treating as absent");
            return Ok(None);
        }
        Ok(Some(secret))
    }

    /// Obfuscate and persist the credential, replacing any previous value.
    pub fn try_save_credential(&self, secret: &str) -> Result<(), StoreError> {
        self.write_atomic(CREDENTIAL_FILE, &vault::obfuscate(secret))
    }

    /// Fail-soft load of the principle set.
    pub fn load_principles(&self) -> Option<Vec<Principle>> {
        self.try_load_principles().unwrap_or_else(|err| {
            warn!("failed to load principles, using defaults (reason={err})");
            None
        })
    }

    /// Fail-soft load of the decision history.
    pub fn load_decisions(&self) -> Vec<DecisionRecord> {
        self.try_load_decisions().unwrap_or_else(|err| {
            warn!("failed to load decisions, starting empty (reason={err})");
            Vec::new()
        })
    }

    /// Fail-soft load of the credential.
    pub fn load_credential(&self) -> Option<String> {
        self.try_load_credential().unwrap_or_else(|err| {
            warn!("failed to load credential (reason={err})");
            None
        })
    }

    /// Fail-soft save of the principle set; false means the value was lost.
    pub fn save_principles(&self, principles: &[Principle]) -> bool {
        match self.try_save_principles(principles) {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to save principles (reason={err})");
                false
            }
        }
    }

    /// Fail-soft save of the decision history.
    pub fn save_decisions(&self, decisions: &[DecisionRecord]) -> bool {
        match self.try_save_decisions(decisions) {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to save decisions (reason={err})");
                false
            }
        }
    }

    /// Fail-soft save of the credential.
    pub fn save_credential(&self, secret: &str) -> bool {
        match self.try_save_credential(secret) {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to save credential (reason={err})");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CREDENTIAL_FILE, FileStore};
    use keel_core::{DecisionRecord, Principle, Reflection};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(situation: &str, advice: &str) -> DecisionRecord {
        let principle = Principle::new("Courage", "act");
        let mut reflection = Reflection::from_principle(&principle, "why?");
        reflection.answer = Some("because".to_string());
        DecisionRecord::new(situation, vec![reflection], advice).expect("record")
    }

    #[test]
    fn missing_files_load_as_absent() {
        let temp = tempdir().expect("tempdir");
        let store = FileStore::new(temp.path()).expect("store");
        assert_eq!(store.load_principles(), None);
        assert_eq!(store.load_decisions(), Vec::new());
        assert_eq!(store.load_credential(), None);
    }

    #[test]
    fn principles_round_trip_preserves_order() {
        let temp = tempdir().expect("tempdir");
        let store = FileStore::new(temp.path()).expect("store");
        let principles = vec![
            Principle::new("First", "a"),
            Principle::new("Second", "b"),
            Principle::new("Third", "c"),
        ];
        assert!(store.save_principles(&principles));
        assert_eq!(store.load_principles(), Some(principles));
    }

    #[test]
    fn decisions_round_trip_preserves_given_order() {
        let temp = tempdir().expect("tempdir");
        let store = FileStore::new(temp.path()).expect("store");
        let newest = record("second dilemma", "advice b");
        let oldest = record("first dilemma", "advice a");
        let history = vec![newest.clone(), oldest.clone()];
        assert!(store.save_decisions(&history));
        let loaded = store.load_decisions();
        assert_eq!(loaded, vec![newest, oldest]);
    }

    #[test]
    fn credential_is_stored_obfuscated() {
        let temp = tempdir().expect("tempdir");
        let store = FileStore::new(temp.path()).expect("store");
        assert!(store.save_credential("sk-secret"));
        let on_disk =
            std::fs::read_to_string(temp.path().join(CREDENTIAL_FILE)).expect("read file");
        assert!(!on_disk.contains("sk-secret"));
        assert_eq!(store.load_credential(), Some("sk-secret".to_string()));
    }

    #[test]
    fn corrupt_files_degrade_to_absent() {
        let temp = tempdir().expect("tempdir");
        let store = FileStore::new(temp.path()).expect("store");
        std::fs::write(temp.path().join("principles.json"), "not json").expect("write");
        std::fs::write(temp.path().join("decisions.json"), "[{}").expect("write");
        std::fs::write(temp.path().join(CREDENTIAL_FILE), "!!!").expect("write");
        assert_eq!(store.load_principles(), None);
        assert_eq!(store.load_decisions(), Vec::new());
        assert_eq!(store.load_credential(), None);
    }

    #[test]
    fn resave_overwrites_whole_value() {
        let temp = tempdir().expect("tempdir");
        let store = FileStore::new(temp.path()).expect("store");
        store.save_credential("old");
        store.save_credential("new");
        assert_eq!(store.load_credential(), Some("new".to_string()));
    }
}
