use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use foodie_core::{Identity, ServiceError};

use crate::model::AddComment;
use crate::service::CommentService;

/// Shared application state.
pub type AppState = Arc<CommentService>;

/// Build the comment API router. Paths are the legacy flat names the
/// frontend already calls; the binary mounts them under `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/addParentComment", post(add_parent_comment))
        .route("/findComments", get(find_comments))
        .route("/findCommentsForRestaurant", get(find_restaurant_comments))
        .route("/deleteComment", get(delete_comment))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PosterQuery {
    #[serde(default)]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestaurantQuery {
    #[serde(default)]
    restaurant: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteQuery {
    #[serde(default)]
    id: Option<String>,
}

async fn add_parent_comment(
    State(svc): State<AppState>,
    Json(input): Json<AddComment>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let view = svc.add_parent_comment(input)?;
    Ok(Json(serde_json::json!({"error": false, "data": view})))
}

async fn find_comments(
    State(svc): State<AppState>,
    Query(query): Query<PosterQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let views = svc.find_by_poster(query.poster).map_err(|e| {
        warn!("failed to query comments: {}", e);
        e
    })?;
    Ok(Json(serde_json::json!({"data": views})))
}

async fn find_restaurant_comments(
    State(svc): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let views = svc.find_by_restaurant(query.restaurant).map_err(|e| {
        warn!("failed to query restaurant comments: {}", e);
        e
    })?;
    Ok(Json(serde_json::json!({"data": views})))
}

async fn delete_comment(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_comment(&identity, query.id)?;
    Ok(Json(serde_json::json!({"error": false})))
}
