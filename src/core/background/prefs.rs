//! Durable string preferences.
//!
//! One redb table per namespace; each write is its own transaction, so an
//! overwrite is atomic.

use std::path::{Path, PathBuf};

use redb::{Database, TableDefinition, TableError};

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

pub const PREFS_NAMESPACE: &str = "TranslatorAppPrefs";

pub trait PreferenceStore: Send + Sync {
    fn get_string(&self, key: &str) -> AppResult<Option<String>>;
    fn put_string(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Redb-based preference storage
pub struct RedbPreferences {
    db: Database,
    namespace: String,
}

impl RedbPreferences {
    pub fn open(path: &Path, namespace: &str) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Io(format!("Failed to create data directory: {}", e)))?;
        }
        let db = Database::create(path)
            .map_err(|e| AppError::Storage(format!("Failed to open preferences: {}", e)))?;
        Ok(Self {
            db,
            namespace: namespace.to_string(),
        })
    }

    /// `preferences.redb` in the platform data directory.
    pub fn default_path() -> AppResult<PathBuf> {
        Ok(AppSettings::project_dirs()?.data_dir().join("preferences.redb"))
    }

    fn table(&self) -> TableDefinition<'_, &'static str, &'static str> {
        TableDefinition::new(&self.namespace)
    }
}

fn storage_err(e: impl std::fmt::Display) -> AppError {
    AppError::Storage(e.to_string())
}

impl PreferenceStore for RedbPreferences {
    fn get_string(&self, key: &str) -> AppResult<Option<String>> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = match read_txn.open_table(self.table()) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(storage_err(e)),
        };
        let value = table.get(key).map_err(storage_err)?;
        Ok(value.map(|v| v.value().to_string()))
    }

    fn put_string(&self, key: &str, value: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(self.table()).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(self.table()).map_err(storage_err)?;
            table.remove(key).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = RedbPreferences::open(&dir.path().join("prefs.redb"), PREFS_NAMESPACE).unwrap();
        assert_eq!(prefs.get_string("background_uri").unwrap(), None);
        prefs.remove("background_uri").unwrap();
    }

    #[test]
    fn test_last_write_wins_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("prefs.redb");
        {
            let prefs = RedbPreferences::open(&path, PREFS_NAMESPACE).unwrap();
            prefs.put_string("background_uri", "/a.png").unwrap();
            prefs.put_string("background_uri", "/b.png").unwrap();
        }
        let prefs = RedbPreferences::open(&path, PREFS_NAMESPACE).unwrap();
        assert_eq!(prefs.get_string("background_uri").unwrap().as_deref(), Some("/b.png"));

        prefs.remove("background_uri").unwrap();
        assert_eq!(prefs.get_string("background_uri").unwrap(), None);
    }

    #[test]
    fn test_namespaces_are_separate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.redb");
        {
            let a = RedbPreferences::open(&path, "first").unwrap();
            a.put_string("k", "from-first").unwrap();
        }
        let b = RedbPreferences::open(&path, "second").unwrap();
        assert_eq!(b.get_string("k").unwrap(), None);
    }
}
