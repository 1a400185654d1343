pub mod account;
pub mod social;
pub mod token;

use std::sync::Arc;

use foodie_core::{Collection, ServiceError};
use foodie_kv::KvStore;

use crate::model::User;

/// Configuration for the user service.
#[derive(Debug, Clone)]
pub struct UserConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 24h).
    pub token_ttl: i64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "foodie-dev-secret-change-me".to_string(),
            token_ttl: 86400,
        }
    }
}

/// The user service. Holds the user collection and token configuration.
pub struct UserService {
    pub(crate) users: Collection<User>,
    pub(crate) config: UserConfig,
}

impl UserService {
    pub fn new(kv: Arc<dyn KvStore>, config: UserConfig) -> Arc<Self> {
        Arc::new(Self {
            users: Collection::new(kv),
            config,
        })
    }

    /// Look a user up by email. Other modules key requests by the
    /// caller-supplied email header, so this is public.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.users.find_one(|u| u.email == email)
    }

    pub(crate) fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, ServiceError> {
        self.users.find_one(|u| u.user_name == user_name)
    }

    /// Get a user by document id. Returns None for unknown ids.
    pub fn get_user(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.users.get(id)
    }
}
