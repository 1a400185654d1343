//! Document trait + Collection CRUD operations.
//!
//! A model impls `Document` to declare its key prefix and id field.
//! `Collection<T>` provides insert/get/find/save/delete over a KvStore
//! backend, storing each document as JSON under `{prefix}{id}`.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use foodie_kv::KvStore;

use crate::error::ServiceError;
use crate::types::is_valid_id;

/// Trait implemented by models stored in a document collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key prefix naming the collection, e.g. `"comment:"`.
    fn prefix() -> &'static str;

    /// The document id. Empty until `before_insert` assigns one.
    fn id(&self) -> &str;

    /// Called once before first persist. Assigns the id and creation
    /// timestamps.
    fn before_insert(&mut self);
}

/// A typed document collection over a KvStore backend.
///
/// Holds no state of its own beyond the backend handle; every operation is
/// a single store call.
pub struct Collection<T: Document> {
    kv: Arc<dyn KvStore>,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            _marker: std::marker::PhantomData,
        }
    }

    fn make_key(id: &str) -> String {
        format!("{}{}", T::prefix(), id)
    }

    /// The store only accepts ids it could have generated. Anything else is
    /// rejected with an input-shaped storage error, before any backend call.
    fn check_id(id: &str) -> Result<(), ServiceError> {
        if is_valid_id(id) {
            Ok(())
        } else {
            Err(ServiceError::Storage(format!(
                "malformed document id '{}'",
                id
            )))
        }
    }

    fn kv_err(e: foodie_kv::KvError) -> ServiceError {
        ServiceError::Unavailable(e.to_string())
    }

    fn decode(bytes: &[u8]) -> Result<T, ServiceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::Internal(format!("deserialize: {}", e)))
    }

    /// Insert a new document. Runs `before_insert` (id + timestamps) and
    /// persists. There is no uniqueness check here — collections that need
    /// one (users by email) enforce it at the service layer.
    pub fn insert(&self, mut doc: T) -> Result<T, ServiceError> {
        doc.before_insert();
        let key = Self::make_key(doc.id());
        let bytes = serde_json::to_vec(&doc)
            .map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))?;
        self.kv.set(&key, &bytes).map_err(Self::kv_err)?;
        Ok(doc)
    }

    /// Overwrite an existing document in place, keyed by its id.
    pub fn save(&self, doc: T) -> Result<T, ServiceError> {
        Self::check_id(doc.id())?;
        let key = Self::make_key(doc.id());
        let bytes = serde_json::to_vec(&doc)
            .map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))?;
        self.kv.set(&key, &bytes).map_err(Self::kv_err)?;
        Ok(doc)
    }

    /// Get a document by id. Returns None if not found.
    pub fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        Self::check_id(id)?;
        match self.kv.get(&Self::make_key(id)).map_err(Self::kv_err)? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List every document in the collection.
    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        let entries = self.kv.scan(T::prefix()).map_err(Self::kv_err)?;
        let mut docs = Vec::with_capacity(entries.len());
        for (_key, bytes) in entries {
            docs.push(Self::decode(&bytes)?);
        }
        Ok(docs)
    }

    /// Scan the collection and keep documents matching the predicate.
    ///
    /// A prefix scan plus in-memory filter; fine at this app's scale, and
    /// the same approach the rest of the store takes for secondary lookups.
    pub fn find<F>(&self, pred: F) -> Result<Vec<T>, ServiceError>
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.list()?;
        docs.retain(|d| pred(d));
        Ok(docs)
    }

    /// Find the first document matching the predicate.
    pub fn find_one<F>(&self, pred: F) -> Result<Option<T>, ServiceError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.find(pred)?.into_iter().next())
    }

    /// Delete a document by id. Idempotent: deleting a missing id succeeds
    /// and is indistinguishable from a real removal.
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        Self::check_id(id)?;
        self.kv.delete(&Self::make_key(id)).map_err(Self::kv_err)
    }

    /// Count all documents in the collection.
    pub fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.kv.scan(T::prefix()).map_err(Self::kv_err)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{new_id, now_rfc3339};
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Thing {
        id: String,
        name: String,
        count: u32,
    }

    impl Document for Thing {
        fn prefix() -> &'static str {
            "thing:"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn before_insert(&mut self) {
            if self.id.is_empty() {
                self.id = new_id();
            }
            let _ = now_rfc3339();
        }
    }

    fn collection() -> (Collection<Thing>, tempfile::NamedTempFile) {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let kv: Arc<dyn KvStore> = Arc::new(foodie_kv::RedbStore::open(tmp.path()).unwrap());
        (Collection::new(kv), tmp)
    }

    fn thing(name: &str) -> Thing {
        Thing {
            id: String::new(),
            name: name.to_string(),
            count: 0,
        }
    }

    #[test]
    fn insert_assigns_distinct_ids() {
        let (coll, _tmp) = collection();
        let a = coll.insert(thing("a")).unwrap();
        let b = coll.insert(thing("a")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(coll.count().unwrap(), 2);
    }

    #[test]
    fn get_roundtrip() {
        let (coll, _tmp) = collection();
        let a = coll.insert(thing("a")).unwrap();
        assert_eq!(coll.get(&a.id).unwrap(), Some(a));
    }

    #[test]
    fn get_rejects_malformed_id() {
        let (coll, _tmp) = collection();
        let err = coll.get("not-an-id").unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn find_filters() {
        let (coll, _tmp) = collection();
        coll.insert(thing("a")).unwrap();
        coll.insert(thing("b")).unwrap();
        coll.insert(thing("a")).unwrap();

        let found = coll.find(|t| t.name == "a").unwrap();
        assert_eq!(found.len(), 2);
        assert!(coll.find(|t| t.name == "zzz").unwrap().is_empty());
    }

    #[test]
    fn delete_is_idempotent() {
        let (coll, _tmp) = collection();
        let a = coll.insert(thing("a")).unwrap();
        coll.delete(&a.id).unwrap();
        assert_eq!(coll.get(&a.id).unwrap(), None);
        // Second delete of the same id is still success.
        coll.delete(&a.id).unwrap();
    }

    #[test]
    fn delete_rejects_malformed_id() {
        let (coll, _tmp) = collection();
        assert!(matches!(
            coll.delete("xyz").unwrap_err(),
            ServiceError::Storage(_)
        ));
    }

    #[test]
    fn save_overwrites() {
        let (coll, _tmp) = collection();
        let mut a = coll.insert(thing("a")).unwrap();
        a.count = 7;
        coll.save(a.clone()).unwrap();
        assert_eq!(coll.get(&a.id).unwrap().unwrap().count, 7);
        assert_eq!(coll.count().unwrap(), 1);
    }
}
