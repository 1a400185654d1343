//! Route registration — module routes under `/api` plus system endpoints.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::auth_middleware::{self, JwtState};

/// Build the complete router. Module routers carry their own state; the
/// JWT middleware wraps everything and lets the public paths through.
pub fn build_router(
    jwt_state: Arc<JwtState>,
    module_routes: Vec<(&str, Router)>,
    places_routes: Router,
) -> Router {
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // The legacy API is flat: every module's routes merge under /api.
    let mut api = Router::new();
    for (_name, router) in module_routes {
        api = api.merge(router);
    }

    Router::new()
        .merge(system_routes)
        .nest("/api", api)
        .nest("/api/places", places_routes)
        .layer(middleware::from_fn_with_state(
            jwt_state,
            auth_middleware::auth_middleware,
        ))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "foodied",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use jsonwebtoken::{DecodingKey, Validation};
    use tower::ServiceExt;

    use foodie_core::Module;
    use user::service::UserConfig;

    const SECRET: &str = "test-secret";

    struct NoPlaces;

    #[async_trait::async_trait]
    impl restaurant::places::PlacesClient for NoPlaces {
        async fn nearby_search(
            &self,
            _: &restaurant::places::PlaceParams,
        ) -> Result<Vec<restaurant::places::Place>, foodie_core::ServiceError> {
            Err(foodie_core::ServiceError::Unavailable(
                "no upstream in tests".into(),
            ))
        }
    }

    fn app() -> (Router, tempfile::NamedTempFile) {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let kv: std::sync::Arc<dyn foodie_kv::KvStore> =
            std::sync::Arc::new(foodie_kv::RedbStore::open(tmp.path()).unwrap());

        let user_module = user::UserModule::new(
            kv.clone(),
            UserConfig {
                jwt_secret: SECRET.into(),
                token_ttl: 3600,
            },
        );
        let comment_module = comment::CommentModule::new(kv.clone());
        let restaurant_module = restaurant::RestaurantModule::new(kv.clone());

        let places = restaurant::places::router(restaurant::places::PlacesState {
            restaurants: restaurant_module.service().clone(),
            users: user_module.service().clone(),
            client: std::sync::Arc::new(NoPlaces),
        });

        let module_routes = vec![
            (user_module.name(), user_module.routes()),
            (comment_module.name(), comment_module.routes()),
            (restaurant_module.name(), restaurant_module.routes()),
        ];

        let jwt_state = Arc::new(JwtState {
            decoding_key: DecodingKey::from_secret(SECRET.as_bytes()),
            validation: Validation::default(),
        });

        (build_router(jwt_state, module_routes, places), tmp)
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

    async fn register(app: &Router, email: &str, user_name: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "userName": user_name,
            "password": "password0",
            "birthdate": "2000-01-01",
        });
        let req = Request::builder()
            .method("POST")
            .uri("/api/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_and_version_are_public() {
        let (app, _tmp) = app();
        let (status, body) = send(
            &app,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(
            &app,
            Request::builder().uri("/version").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "foodied");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let (app, _tmp) = app();

        let (status, body) = send(
            &app,
            Request::builder()
                .uri("/api/findComments?poster=u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], true);

        let (status, _) = send(
            &app,
            Request::builder()
                .uri("/api/findComments?poster=u1")
                .header("authorization", "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_token_opens_the_api() {
        let (app, _tmp) = app();
        let token = register(&app, "a@b.com", "alice").await;

        let (status, body) = send(
            &app,
            Request::builder()
                .uri("/api/findComments?poster=alice")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], serde_json::json!([]));

        // The auth echo resolves the token back to the account.
        let (status, body) = send(
            &app,
            Request::builder()
                .uri("/api/auth")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["userName"], "alice");
    }

    #[tokio::test]
    async fn member_token_cannot_delete_comments() {
        let (app, _tmp) = app();
        let token = register(&app, "a@b.com", "alice").await;

        let add = Request::builder()
            .method("POST")
            .uri("/api/addParentComment")
            .header(header::CONTENT_TYPE, "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(
                serde_json::to_vec(&serde_json::json!({"poster": "alice", "content": "hi"}))
                    .unwrap(),
            ))
            .unwrap();
        let (status, created) = send(&app, add).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Request::builder()
                .uri(format!("/api/deleteComment?id={}", id))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn places_without_upstream_is_503() {
        let (app, _tmp) = app();
        let token = register(&app, "a@b.com", "alice").await;

        let (status, _) = send(
            &app,
            Request::builder()
                .uri("/api/places/find?latitude=1&longitude=2")
                .header("authorization", format!("Bearer {}", token))
                .header("email", "a@b.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
