use foodie_core::{ServiceError, now_rfc3339};

use crate::model::{User, UserView};
use crate::service::UserService;

impl UserService {
    /// Add a restaurant to the user's likes (set semantics).
    pub fn add_like(&self, user_name: &str, restaurant: &str) -> Result<(), ServiceError> {
        self.update_named_user(user_name, |user| {
            push_unique(&mut user.likes, restaurant);
        })
    }

    /// Add a restaurant to the user's dislikes (set semantics).
    pub fn add_dislike(&self, user_name: &str, restaurant: &str) -> Result<(), ServiceError> {
        self.update_named_user(user_name, |user| {
            push_unique(&mut user.dislikes, restaurant);
        })
    }

    /// Add a friend to the user's friend list (set semantics).
    pub fn add_friend(&self, user_name: &str, friend: &str) -> Result<UserView, ServiceError> {
        self.update_named_user(user_name, |user| {
            push_unique(&mut user.friends, friend);
        })?;
        let user = self.require_named_user(user_name)?;
        Ok(user.view(None))
    }

    pub fn get_likes(&self, user_name: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.require_named_user(user_name)?.likes)
    }

    pub fn get_dislikes(&self, user_name: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.require_named_user(user_name)?.dislikes)
    }

    /// All users matching a user name. Returns projections only.
    pub fn get_user_info(&self, user_name: &str) -> Result<Vec<UserView>, ServiceError> {
        let matches = self.users.find(|u| u.user_name == user_name)?;
        Ok(matches.iter().map(|u| u.view(None)).collect())
    }

    /// Every registered user, projected.
    pub fn find_users(&self) -> Result<Vec<UserView>, ServiceError> {
        let all = self.users.list()?;
        Ok(all.iter().map(|u| u.view(None)).collect())
    }

    fn require_named_user(&self, user_name: &str) -> Result<User, ServiceError> {
        self.find_by_user_name(user_name)?
            .ok_or_else(|| ServiceError::NotFound(format!("no user named '{}'", user_name)))
    }

    fn update_named_user(
        &self,
        user_name: &str,
        apply: impl FnOnce(&mut User),
    ) -> Result<(), ServiceError> {
        let mut user = self.require_named_user(user_name)?;
        apply(&mut user);
        user.updated_at = now_rfc3339();
        self.users.save(user)?;
        Ok(())
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
