pub mod auth;
pub mod collection;
pub mod error;
pub mod module;
pub mod types;
pub mod validate;

pub use auth::Identity;
pub use collection::{Collection, Document};
pub use error::ServiceError;
pub use module::Module;
pub use types::{is_valid_id, new_id, now_rfc3339};
