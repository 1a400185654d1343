use std::sync::Arc;

use foodie_core::validate::{optional_text, required_text};
use foodie_core::{Collection, Identity, ServiceError};
use foodie_kv::KvStore;

use crate::model::{AddComment, Comment, CommentView, ParentComment};

/// The comment service. A stateless façade: validates untrusted input,
/// issues at most one store call per operation, shapes the projection.
pub struct CommentService {
    comments: Collection<Comment>,
}

impl CommentService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            comments: Collection::new(kv),
        }
    }

    /// Create a parent comment. Validation runs before any store call;
    /// the first failing field rule becomes the error message.
    pub fn add_parent_comment(&self, input: AddComment) -> Result<CommentView, ServiceError> {
        let poster = required_text("poster", input.poster)?;
        let restaurant = optional_text("restaurant", input.restaurant)?;
        let content = required_text("content", input.content)?;

        let comment = Comment::Parent(ParentComment {
            id: String::new(),
            poster,
            restaurant,
            content,
            created_at: String::new(),
            updated_at: String::new(),
        });

        let stored = self.comments.insert(comment)?;
        Ok(stored.view())
    }

    /// Parent comments by poster, oldest first. No matches is an empty
    /// list, never an error.
    pub fn find_by_poster(&self, poster: Option<String>) -> Result<Vec<CommentView>, ServiceError> {
        let poster = required_text("poster", poster)?;
        let mut found = self
            .comments
            .find(|c| c.is_parent() && c.poster() == poster)?;
        found.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        Ok(found.iter().map(Comment::view).collect())
    }

    /// Parent comments on a restaurant, oldest first.
    pub fn find_by_restaurant(
        &self,
        restaurant: Option<String>,
    ) -> Result<Vec<CommentView>, ServiceError> {
        let restaurant = required_text("restaurant", restaurant)?;
        let mut found = self
            .comments
            .find(|c| c.is_parent() && c.restaurant() == Some(restaurant.as_str()))?;
        found.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        Ok(found.iter().map(Comment::view).collect())
    }

    /// Delete a comment (either variant) by id. Admin only; the gate runs
    /// before the id is even looked at. Removing a missing id succeeds —
    /// callers cannot tell "deleted" from "was never there".
    pub fn delete_comment(&self, identity: &Identity, id: Option<String>) -> Result<(), ServiceError> {
        if !identity.is_admin() {
            return Err(ServiceError::Unauthorized(
                "admin role required to delete comments".into(),
            ));
        }
        let id = required_text("id", id)?;
        self.comments.delete(&id)
    }
}
