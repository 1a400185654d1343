//! Authenticated caller identity.
//!
//! Business modules never see tokens. The server's auth middleware verifies
//! the bearer token and injects an `Identity` into request extensions; a
//! handler that needs a capability check reads the flag off the identity.

use serde::{Deserialize, Serialize};

/// The authenticated caller, as resolved by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// User document id.
    pub user_id: String,

    /// Display user name.
    pub user_name: String,

    /// Admin-role flag. Gates destructive operations (comment delete).
    pub admin: bool,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}
