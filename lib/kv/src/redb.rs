use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use tracing::debug;

use crate::error::KvError;
use crate::traits::KvStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// RedbStore is a KvStore implementation backed by redb — a pure-Rust
/// embedded key-value database. One table holds every collection; prefixes
/// keep them apart.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KvError> {
        let db = Database::create(path).map_err(|e| KvError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KvError::Storage(e.to_string()))?;

        debug!("opened redb store at {}", path.display());

        Ok(Self { db: Arc::new(db) })
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KvError::Storage(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(KvError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KvError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KvError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KvError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KvError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KvError::Storage(e.to_string()))?;

        let mut out = Vec::new();
        let range = table
            .range(prefix..)
            .map_err(|e| KvError::Storage(e.to_string()))?;
        for entry in range {
            let (key, value) = entry.map_err(|e| KvError::Storage(e.to_string()))?;
            let key = key.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key, value.value().to_vec()));
        }
        Ok(out)
    }
}
