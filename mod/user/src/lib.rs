//! User module — accounts, sessions and the social graph.
//!
//! # Resources
//!
//! - **User** — account document with argon2id-hashed password, discovery
//!   preferences (profileInfo) and the likes/dislikes/friends lists.
//!
//! Registration and login hand out signed JWTs; the server middleware
//! turns a presented token into a `foodie_core::Identity` for the
//! protected routes.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use foodie_core::Module;

use crate::service::{UserConfig, UserService};

/// User module implementing the Module trait.
pub struct UserModule {
    service: Arc<UserService>,
}

impl UserModule {
    pub fn new(kv: Arc<dyn foodie_kv::KvStore>, config: UserConfig) -> Self {
        Self {
            service: UserService::new(kv, config),
        }
    }

    pub fn service(&self) -> &Arc<UserService> {
        &self.service
    }
}

impl Module for UserModule {
    fn name(&self) -> &str {
        "user"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
