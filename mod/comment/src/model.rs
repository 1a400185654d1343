use serde::{Deserialize, Serialize};

use foodie_core::{Document, new_id, now_rfc3339};

/// A stored comment. Both variants share the `comment:` collection; the
/// serde tag is the stored discriminator and decides which extra fields are
/// legal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "__type")]
pub enum Comment {
    #[serde(rename = "parentComment")]
    Parent(ParentComment),

    /// DEPRECATED — a reply to another comment. Kept so historical data
    /// stays readable; no create path exists.
    #[serde(rename = "childComment")]
    Child(ChildComment),
}

/// A comment on either a user profile or a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentComment {
    /// Unique identifier (UUIDv4, no dashes). Immutable once assigned.
    #[serde(default)]
    pub id: String,

    /// User id of the author.
    pub poster: String,

    /// Restaurant id. Absent means the comment targets a user profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,

    /// Comment body.
    pub content: String,

    /// RFC 3339 creation timestamp, write-once.
    #[serde(default)]
    pub created_at: String,

    /// RFC 3339 last update timestamp. Comments are never updated in
    /// place, so this stays equal to `created_at`.
    #[serde(default)]
    pub updated_at: String,
}

/// DEPRECATED reply variant. Same shape as a parent comment plus the id of
/// the comment it replies to. The parent reference is not referentially
/// enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildComment {
    #[serde(default)]
    pub id: String,

    pub poster: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,

    pub content: String,

    /// Id of the comment this replies to.
    pub parent: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Document for Comment {
    fn prefix() -> &'static str {
        "comment:"
    }

    fn id(&self) -> &str {
        match self {
            Comment::Parent(c) => &c.id,
            Comment::Child(c) => &c.id,
        }
    }

    fn before_insert(&mut self) {
        let now = now_rfc3339();
        match self {
            Comment::Parent(c) => {
                if c.id.is_empty() {
                    c.id = new_id();
                }
                c.created_at = now.clone();
                c.updated_at = now;
            }
            Comment::Child(c) => {
                if c.id.is_empty() {
                    c.id = new_id();
                }
                c.created_at = now.clone();
                c.updated_at = now;
            }
        }
    }
}

impl Comment {
    pub fn is_parent(&self) -> bool {
        matches!(self, Comment::Parent(_))
    }

    pub fn poster(&self) -> &str {
        match self {
            Comment::Parent(c) => &c.poster,
            Comment::Child(c) => &c.poster,
        }
    }

    pub fn restaurant(&self) -> Option<&str> {
        match self {
            Comment::Parent(c) => c.restaurant.as_deref(),
            Comment::Child(c) => c.restaurant.as_deref(),
        }
    }

    pub fn created_at(&self) -> &str {
        match self {
            Comment::Parent(c) => &c.created_at,
            Comment::Child(c) => &c.created_at,
        }
    }

    /// The read projection exposed to API callers. Discriminator and
    /// timestamps stay internal.
    pub fn view(&self) -> CommentView {
        match self {
            Comment::Parent(c) => CommentView {
                id: c.id.clone(),
                poster: c.poster.clone(),
                restaurant: c.restaurant.clone(),
                content: c.content.clone(),
                parent: None,
            },
            Comment::Child(c) => CommentView {
                id: c.id.clone(),
                poster: c.poster.clone(),
                restaurant: c.restaurant.clone(),
                content: c.content.clone(),
                parent: Some(c.parent.clone()),
            },
        }
    }
}

/// What API callers receive for a comment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentView {
    pub id: String,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Request body for creating a parent comment. Fields stay optional here so
/// the service can report the first failing rule itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddComment {
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub restaurant: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
