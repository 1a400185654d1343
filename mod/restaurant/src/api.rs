use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::warn;

use foodie_core::ServiceError;

use crate::service::RestaurantService;

pub type AppState = Arc<RestaurantService>;

/// Build the restaurant API router. The binary mounts it under `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/findRestaurant", get(find_restaurant))
        .with_state(state)
}

async fn find_restaurant(
    State(svc): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let restaurants = svc.find_all().map_err(|e| {
        warn!("failed to list restaurants: {}", e);
        e
    })?;
    Ok(Json(serde_json::json!({"data": restaurants})))
}
