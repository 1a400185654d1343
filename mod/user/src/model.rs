use serde::{Deserialize, Serialize};

use foodie_core::{Document, new_id, now_rfc3339};

/// A user account. Stored under the `user:` prefix; email and user name
/// are unique (enforced by the service before insert).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    #[serde(default)]
    pub id: String,

    pub email: String,

    pub user_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// argon2id PHC string. Never appears in any projection.
    pub password_hash: String,

    pub birthdate: String,

    /// Discovery preferences, set via addProfileInfo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_info: Option<ProfileInfo>,

    #[serde(default)]
    pub signed_in: bool,

    /// Admin-role flag. Gates comment deletion.
    #[serde(default)]
    pub admin: bool,

    /// Liked restaurant place ids (set semantics).
    #[serde(default)]
    pub likes: Vec<String>,

    /// Disliked restaurant place ids (set semantics).
    #[serde(default)]
    pub dislikes: Vec<String>,

    /// Friend user names (set semantics).
    #[serde(default)]
    pub friends: Vec<String>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

/// Restaurant-discovery preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    /// Preferred search radius, km.
    pub distance: f64,
    /// Preferred cuisines.
    pub food_types: Vec<String>,
    /// Preferred price bucket: "$", "$$", "$$$" or "none".
    pub price: String,
    /// Dining style preference.
    pub dining: f64,
}

impl Document for User {
    fn prefix() -> &'static str {
        "user:"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn before_insert(&mut self) {
        if self.id.is_empty() {
            self.id = new_id();
        }
        let now = now_rfc3339();
        self.created_at = now.clone();
        self.updated_at = now;
    }
}

/// Registration request body. Fields stay optional so the service can
/// report the first failing rule itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub admin: Option<bool>,
}

/// Login request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// What API callers receive for a user. The password hash never leaves
/// the service; the token is only present right after register/login.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub signed_in: bool,
    pub admin: bool,
    pub friends: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    pub fn view(&self, token: Option<String>) -> UserView {
        UserView {
            id: self.id.clone(),
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            signed_in: self.signed_in,
            admin: self.admin,
            friends: self.friends.clone(),
            token,
        }
    }
}

/// JWT claims payload. The server middleware decodes these and turns them
/// into a `foodie_core::Identity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    /// Display user name.
    pub name: String,
    /// Admin-role flag.
    #[serde(default)]
    pub admin: bool,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}
