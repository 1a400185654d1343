use email_address::EmailAddress;

use foodie_core::validate::required_text;
use foodie_core::{Identity, ServiceError, now_rfc3339};

use crate::model::{Login, ProfileInfo, Register, User, UserView};
use crate::service::UserService;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LEN: usize = 6;

impl UserService {
    /// Register a new account. The password is stored as an argon2id hash;
    /// a signed token is returned so the client is logged in immediately.
    pub fn register(&self, input: Register) -> Result<UserView, ServiceError> {
        let email = required_text("email", input.email)?;
        if !EmailAddress::is_valid(&email) {
            return Err(ServiceError::Validation(
                "email must be a valid email".into(),
            ));
        }
        let user_name = required_text("userName", input.user_name)?;
        let password = required_text("password", input.password)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "password length must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        let birthdate = required_text("birthdate", input.birthdate)?;

        // Legacy clients match on these exact 401 responses, so the
        // duplicate checks do not use the usual 409 conflict mapping.
        if self.find_by_email(&email)?.is_some() {
            return Err(ServiceError::Unauthorized("email already exists.".into()));
        }
        if self.find_by_user_name(&user_name)?.is_some() {
            return Err(ServiceError::Unauthorized(
                "user name already exists.".into(),
            ));
        }

        let user = User {
            id: String::new(),
            email,
            user_name,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash: hash_password(&password)?,
            birthdate,
            profile_info: None,
            signed_in: false,
            admin: input.admin.unwrap_or(false),
            likes: Vec::new(),
            dislikes: Vec::new(),
            friends: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        };

        let stored = self.users.insert(user)?;
        let token = self.issue_token(&stored)?;
        Ok(stored.view(Some(token)))
    }

    /// Log a user in. Every failure here is a 401 — the client cannot tell
    /// an unknown email from a wrong password beyond the message text.
    pub fn login(&self, input: Login) -> Result<UserView, ServiceError> {
        let email = input
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("email is required".into()))?;
        let password = input
            .password
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("password is required".into()))?;

        let mut user = self
            .find_by_email(&email)?
            .ok_or_else(|| ServiceError::Unauthorized("cannot find email".into()))?;

        if !verify_password(&password, &user.password_hash) {
            return Err(ServiceError::Unauthorized("incorrect password".into()));
        }

        user.signed_in = true;
        user.updated_at = now_rfc3339();
        let stored = self.users.save(user)?;
        let token = self.issue_token(&stored)?;
        Ok(stored.view(Some(token)))
    }

    /// Resolve an authenticated identity back to its user document.
    pub fn check_auth(&self, identity: &Identity) -> Result<UserView, ServiceError> {
        let user = self
            .get_user(&identity.user_id)?
            .ok_or_else(|| ServiceError::Unauthorized("wrong token".into()))?;
        Ok(user.view(None))
    }

    /// Whether a user name is already taken.
    pub fn user_name_exists(&self, user_name: &str) -> Result<bool, ServiceError> {
        Ok(self.find_by_user_name(user_name)?.is_some())
    }

    /// Whether an email is already registered. Rejects malformed emails.
    pub fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
        if !EmailAddress::is_valid(email) {
            return Err(ServiceError::Validation(
                "email must be a valid email".into(),
            ));
        }
        Ok(self.find_by_email(email)?.is_some())
    }

    /// Replace the discovery preferences of the user owning `email`.
    pub fn add_profile_info(
        &self,
        email: &str,
        info: ProfileInfo,
    ) -> Result<UserView, ServiceError> {
        let mut user = self.find_by_email(email)?.ok_or_else(|| {
            ServiceError::NotFound(format!("no user registered under '{}'", email))
        })?;
        user.profile_info = Some(info);
        user.updated_at = now_rfc3339();
        let stored = self.users.save(user)?;
        Ok(stored.view(None))
    }
}

/// Hash a password with argon2id, producing a PHC string.
pub(crate) fn hash_password(password: &str) -> Result<String, ServiceError> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password attempt against a stored PHC string.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
