//! JWT authentication middleware.
//!
//! Extracts the token from `Authorization: Bearer <token>`, validates it
//! and stores both the raw `Claims` and a `foodie_core::Identity` in the
//! request extensions for downstream handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{DecodingKey, Validation};

use foodie_core::Identity;
use user::model::Claims;

/// Shared JWT configuration for the middleware.
#[derive(Clone)]
pub struct JwtState {
    pub decoding_key: DecodingKey,
    pub validation: Validation,
}

/// Authentication failures, rendered in the API's error envelope.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let msg = match self {
            AuthError::MissingToken => "missing authorization token".to_string(),
            AuthError::InvalidToken(e) => format!("invalid token: {}", e),
        };
        let body = serde_json::json!({
            "error": true,
            "code": "UNAUTHENTICATED",
            "data": msg,
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Middleware guarding everything but the public endpoints.
pub async fn auth_middleware(
    State(jwt_state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let path = request.uri().path().to_string();

    if is_public_path(&path) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let token_data =
        jsonwebtoken::decode::<Claims>(token, &jwt_state.decoding_key, &jwt_state.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    let claims = token_data.claims;
    let identity = Identity {
        user_id: claims.sub.clone(),
        user_name: claims.name.clone(),
        admin: claims.admin,
    };
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Endpoints reachable without a token.
fn is_public_path(path: &str) -> bool {
    matches!(path, "/health" | "/version" | "/api/login" | "/api/register")
        || path.starts_with("/api/check_username/")
        || path.starts_with("/api/check_email/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api/login"));
        assert!(is_public_path("/api/check_username/alice"));
        assert!(is_public_path("/api/check_email/a@b.com"));
        assert!(!is_public_path("/api/findComments"));
        assert!(!is_public_path("/api/deleteComment"));
        assert!(!is_public_path("/api/places/find"));
    }
}
