use crate::error::KvError;

/// KvStore provides the key-value storage interface backing all document
/// collections.
///
/// Keys follow a namespaced convention: `comment:<id>`, `user:<id>`,
/// `restaurant:<id>`. A collection is the set of keys sharing one prefix.
pub trait KvStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Set a key-value pair, overwriting any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KvError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KvError>;
}
