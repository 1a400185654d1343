//! Comment module — the two-tier comment system.
//!
//! # Resources
//!
//! - **Comment** — one physical collection, two variants behind the
//!   `__type` discriminator: `parentComment` (on a user profile or a
//!   restaurant) and the deprecated, read-only `childComment` (a reply).
//!
//! Parent comments are create/read/delete only; nothing updates a comment
//! in place. Delete is admin-gated and idempotent.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use foodie_core::Module;

use crate::service::CommentService;

/// Comment module implementing the Module trait.
pub struct CommentModule {
    service: Arc<CommentService>,
}

impl CommentModule {
    pub fn new(kv: Arc<dyn foodie_kv::KvStore>) -> Self {
        Self {
            service: Arc::new(CommentService::new(kv)),
        }
    }

    pub fn service(&self) -> &Arc<CommentService> {
        &self.service
    }
}

impl Module for CommentModule {
    fn name(&self) -> &str {
        "comment"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
