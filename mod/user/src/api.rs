use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use foodie_core::validate::required_text;
use foodie_core::{Identity, ServiceError};

use crate::model::{Login, ProfileInfo, Register};
use crate::service::UserService;

pub type AppState = Arc<UserService>;

/// Build the user API router. The binary mounts it under `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/auth", get(check_auth))
        .route("/addProfileInfo", post(add_profile_info))
        .route("/check_username/{userName}", get(check_user_name))
        .route("/check_email/{email}", get(check_email))
        .route("/addLike", post(add_like))
        .route("/addDislike", post(add_dislike))
        .route("/getLikes", get(get_likes))
        .route("/getDislikes", get(get_dislikes))
        .route("/getUserInfo", get(get_user_info))
        .route("/findUsers", get(find_users))
        .route("/addFriend", post(add_friend))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct UserNameQuery {
    #[serde(default)]
    #[serde(rename = "userName")]
    user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestaurantOpinion {
    #[serde(default)]
    #[serde(rename = "userName")]
    user_name: Option<String>,
    #[serde(default)]
    restaurant: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddFriend {
    #[serde(default)]
    #[serde(rename = "userName")]
    user_name: Option<String>,
    /// Singular value despite the legacy plural field name.
    #[serde(default)]
    friends: Option<String>,
}

async fn login(
    State(svc): State<AppState>,
    Json(input): Json<Login>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let view = svc.login(input)?;
    Ok(Json(serde_json::json!({"error": false, "data": view})))
}

async fn register(
    State(svc): State<AppState>,
    Json(input): Json<Register>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let view = svc.register(input)?;
    Ok(Json(serde_json::json!({"error": false, "data": view})))
}

async fn check_auth(
    State(svc): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let view = svc.check_auth(&identity)?;
    Ok(Json(serde_json::json!({"error": false, "data": view})))
}

/// The profile body must carry exactly the four preference keys; anything
/// else is rejected before deserialization is attempted.
async fn add_profile_info(
    State(svc): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let email = header_email(&headers)?;

    let mut keys: Vec<&str> = body
        .as_object()
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default();
    keys.sort_unstable();
    if keys != ["dining", "distance", "foodTypes", "price"] {
        return Err(ServiceError::Validation("invalid params".into()));
    }

    let info: ProfileInfo = serde_json::from_value(body)
        .map_err(|_| ServiceError::Validation("invalid params".into()))?;
    let view = svc.add_profile_info(&email, info).map_err(|e| {
        warn!("failed to store profile info: {}", e);
        e
    })?;
    Ok(Json(serde_json::json!({"error": false, "data": view})))
}

async fn check_user_name(
    State(svc): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let exists = svc.user_name_exists(&user_name)?;
    Ok(Json(serde_json::json!({"error": false, "exists": exists})))
}

async fn check_email(
    State(svc): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let exists = svc.email_exists(&email)?;
    Ok(Json(serde_json::json!({"error": false, "exists": exists})))
}

async fn add_like(
    State(svc): State<AppState>,
    Json(input): Json<RestaurantOpinion>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_name = required_text("userName", input.user_name)?;
    let restaurant = required_text("restaurant", input.restaurant)?;
    svc.add_like(&user_name, &restaurant)?;
    Ok(Json(serde_json::json!({"error": false})))
}

async fn add_dislike(
    State(svc): State<AppState>,
    Json(input): Json<RestaurantOpinion>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_name = required_text("userName", input.user_name)?;
    let restaurant = required_text("restaurant", input.restaurant)?;
    svc.add_dislike(&user_name, &restaurant)?;
    Ok(Json(serde_json::json!({"error": false})))
}

async fn get_likes(
    State(svc): State<AppState>,
    Query(query): Query<UserNameQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_name = required_text("userName", query.user_name)?;
    let likes = svc.get_likes(&user_name)?;
    Ok(Json(serde_json::json!({"error": false, "data": likes})))
}

async fn get_dislikes(
    State(svc): State<AppState>,
    Query(query): Query<UserNameQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_name = required_text("userName", query.user_name)?;
    let dislikes = svc.get_dislikes(&user_name)?;
    Ok(Json(serde_json::json!({"error": false, "data": dislikes})))
}

async fn get_user_info(
    State(svc): State<AppState>,
    Query(query): Query<UserNameQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_name = required_text("userName", query.user_name)?;
    let views = svc.get_user_info(&user_name)?;
    Ok(Json(serde_json::json!({"data": views})))
}

async fn find_users(
    State(svc): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let views = svc.find_users().map_err(|e| {
        warn!("failed to list users: {}", e);
        e
    })?;
    Ok(Json(serde_json::json!({"data": views})))
}

async fn add_friend(
    State(svc): State<AppState>,
    Json(input): Json<AddFriend>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user_name = required_text("userName", input.user_name)?;
    let friend = required_text("friends", input.friends)?;
    let view = svc.add_friend(&user_name, &friend)?;
    Ok(Json(serde_json::json!({"error": false, "data": view})))
}

pub(crate) fn header_email(headers: &HeaderMap) -> Result<String, ServiceError> {
    headers
        .get("email")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Validation("email header is required".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::service::UserConfig;

    fn app() -> (Router, tempfile::NamedTempFile) {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let kv: Arc<dyn foodie_kv::KvStore> =
            Arc::new(foodie_kv::RedbStore::open(tmp.path()).unwrap());
        let svc = UserService::new(kv, UserConfig::default());
        (router(svc), tmp)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn register_body(email: &str, user_name: &str) -> serde_json::Value {
        serde_json::json!({
            "email": email,
            "userName": user_name,
            "password": "password0",
            "birthdate": "2000-01-01",
        })
    }

    #[tokio::test]
    async fn register_login_roundtrip() {
        let (app, _tmp) = app();

        let (status, body) = send(&app, post_json("/register", register_body("a@b.com", "alice"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], false);
        assert!(body["data"]["token"].is_string());
        assert!(body["data"].get("passwordHash").is_none());

        let (status, body) = send(
            &app,
            post_json("/login", serde_json::json!({"email": "a@b.com", "password": "password0"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["signedIn"], true);
    }

    #[tokio::test]
    async fn duplicate_email_register_is_401() {
        let (app, _tmp) = app();
        send(&app, post_json("/register", register_body("a@b.com", "alice"))).await;

        let (status, body) = send(&app, post_json("/register", register_body("a@b.com", "other"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], true);
        assert_eq!(body["data"], "email already exists.");
    }

    #[tokio::test]
    async fn availability_routes() {
        let (app, _tmp) = app();
        send(&app, post_json("/register", register_body("a@b.com", "alice"))).await;

        let (status, body) = send(&app, get_req("/check_username/alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], true);

        let (_, body) = send(&app, get_req("/check_username/bob")).await;
        assert_eq!(body["exists"], false);

        let (_, body) = send(&app, get_req("/check_email/a@b.com")).await;
        assert_eq!(body["exists"], true);

        let (status, _) = send(&app, get_req("/check_email/not-an-email")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn profile_info_requires_exact_shape() {
        let (app, _tmp) = app();
        send(&app, post_json("/register", register_body("a@b.com", "alice"))).await;

        let good = serde_json::json!({
            "distance": 10.0, "foodTypes": ["thai"], "price": "$$", "dining": 1.0
        });

        // Missing email header.
        let (status, _) = send(&app, post_json("/addProfileInfo", good.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Extra key.
        let mut extra = good.clone();
        extra["surprise"] = serde_json::json!(1);
        let req = Request::builder()
            .method("POST")
            .uri("/addProfileInfo")
            .header(header::CONTENT_TYPE, "application/json")
            .header("email", "a@b.com")
            .body(Body::from(serde_json::to_vec(&extra).unwrap()))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"], "invalid params");

        // Well-formed.
        let req = Request::builder()
            .method("POST")
            .uri("/addProfileInfo")
            .header(header::CONTENT_TYPE, "application/json")
            .header("email", "a@b.com")
            .body(Body::from(serde_json::to_vec(&good).unwrap()))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], false);
    }

    #[tokio::test]
    async fn likes_roundtrip_through_the_api() {
        let (app, _tmp) = app();
        send(&app, post_json("/register", register_body("a@b.com", "alice"))).await;

        let (status, _) = send(
            &app,
            post_json("/addLike", serde_json::json!({"userName": "alice", "restaurant": "r1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        send(
            &app,
            post_json("/addLike", serde_json::json!({"userName": "alice", "restaurant": "r1"})),
        )
        .await;

        let (status, body) = send(&app, get_req("/getLikes?userName=alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], serde_json::json!(["r1"]));

        let (status, _) = send(&app, get_req("/getLikes")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn friends_and_listing() {
        let (app, _tmp) = app();
        send(&app, post_json("/register", register_body("a@b.com", "alice"))).await;
        send(&app, post_json("/register", register_body("c@d.com", "carol"))).await;

        let (status, body) = send(
            &app,
            post_json("/addFriend", serde_json::json!({"userName": "alice", "friends": "carol"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["friends"], serde_json::json!(["carol"]));

        let (_, body) = send(&app, get_req("/getUserInfo?userName=alice")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, get_req("/findUsers")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }
}
