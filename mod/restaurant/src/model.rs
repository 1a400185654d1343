use serde::{Deserialize, Serialize};

use foodie_core::{Document, new_id, now_rfc3339};

/// A restaurant known to the app. Stored under the `restaurant:` prefix;
/// `place_id` is the upsert key (unique, enforced by the service).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default)]
    pub id: String,

    /// Google place id.
    pub place_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    // Legacy field name, kept for stored data and API compatibility.
    #[serde(
        rename = "phonenumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    /// Ids of comments left on this restaurant.
    #[serde(default)]
    pub comments: Vec<String>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Document for Restaurant {
    fn prefix() -> &'static str {
        "restaurant:"
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

/// Upsert payload. Only `place_id` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantData {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "phonenumber", default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}
