//! Restaurant module — the restaurants users talk about, plus nearby-place
//! discovery against the Google Places backend.
//!
//! # Resources
//!
//! - **Restaurant** — upserted by Google `place_id`; descriptive fields
//!   come from discovery results or direct writes.
//!
//! Discovery lives in [`places`]: filter translation, the `PlacesClient`
//! boundary and the `/places/find` route.

pub mod api;
pub mod model;
pub mod places;
pub mod service;

use std::sync::Arc;

use axum::Router;

use foodie_core::Module;

use crate::service::RestaurantService;

/// Restaurant module implementing the Module trait.
pub struct RestaurantModule {
    service: Arc<RestaurantService>,
}

impl RestaurantModule {
    pub fn new(kv: Arc<dyn foodie_kv::KvStore>) -> Self {
        Self {
            service: Arc::new(RestaurantService::new(kv)),
        }
    }

    pub fn service(&self) -> &Arc<RestaurantService> {
        &self.service
    }
}

impl Module for RestaurantModule {
    fn name(&self) -> &str {
        "restaurant"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
