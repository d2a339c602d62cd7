//! Snapshot persistence: one JSON document per string key.

use std::path::PathBuf;

use sitekb_shared::{Result, SiteKbError};

/// Storage key holding the serialized entry array.
pub const SNAPSHOT_KEY: &str = "knowledge_base";

/// A key-value store for whole-corpus snapshots.
///
/// Snapshots are written and read as single documents; there is no merging
/// with live state and no per-entry access.
pub trait SnapshotStore {
    /// Read the value for `key`, `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write the value for `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed snapshot store: each key maps to `<root>/<key>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SiteKbError::io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| SiteKbError::io(&self.root, e))?;
        let path = self.key_path(key);
        std::fs::write(&path, value).map_err(|e| SiteKbError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> FileStore {
        let root = std::env::temp_dir().join(format!("sitekb_persist_{}", Uuid::now_v7()));
        FileStore::new(root)
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = temp_store();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn set_then_get_roundtrips() {
        let store = temp_store();
        store.set("snapshot", r#"{"entries":[]}"#).unwrap();
        assert_eq!(
            store.get("snapshot").unwrap().as_deref(),
            Some(r#"{"entries":[]}"#)
        );

        // Overwrite replaces.
        store.set("snapshot", "[]").unwrap();
        assert_eq!(store.get("snapshot").unwrap().as_deref(), Some("[]"));
    }
}
