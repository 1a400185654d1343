use jsonwebtoken::{EncodingKey, Header};

use foodie_core::ServiceError;

use crate::model::{Claims, User};
use crate::service::UserService;

impl UserService {
    /// Sign a token for `user` with the configured secret and lifetime.
    pub fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            name: user.user_name.clone(),
            admin: user.admin,
            iat: now,
            exp: now + self.config.token_ttl,
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("token signing failed: {}", e)))
    }
}
