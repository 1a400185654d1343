pub mod error;
pub mod redb;
pub mod traits;

pub use error::KvError;
pub use redb::RedbStore;
pub use traits::KvStore;
