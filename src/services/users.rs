//! User service
//!
//! Orchestrates user CRUD, friendship management, and the common-friends
//! computation. Validation always runs before any repository mutation.

use crate::domain::models::{NewUser, User};
use crate::domain::validate;
use crate::error::AppError;
use crate::storage::{FriendshipRepository, UserRepository};
use std::sync::Arc;
use tracing::info;

/// User and friendship operations
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    friendships: Arc<dyn FriendshipRepository>,
}

impl UserService {
    /// Create a service over the given repositories
    pub fn new(users: Arc<dyn UserRepository>, friendships: Arc<dyn FriendshipRepository>) -> Self {
        Self { users, friendships }
    }

    /// All registered users
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.get_all().await
    }

    /// A single user
    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.require_user(id).await
    }

    /// Validate and persist a new user
    ///
    /// An empty display name is replaced with the login before storing.
    pub async fn create_user(&self, mut user: NewUser) -> Result<User, AppError> {
        validate::validate_user(&mut user)?;
        let stored = self.users.create(&user).await?;
        info!(user_id = stored.id, login = %stored.login, "Created user");
        Ok(stored)
    }

    /// Validate and replace an existing user
    pub async fn update_user(&self, id: i64, mut user: NewUser) -> Result<User, AppError> {
        validate::validate_user(&mut user)?;
        self.require_user(id).await?;
        let stored = self.users.update(id, &user).await?;
        info!(user_id = id, "Updated user");
        Ok(stored)
    }

    /// Remove a user together with their likes and friendships
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        self.require_user(id).await?;
        self.users.delete(id).await?;
        info!(user_id = id, "Deleted user");
        Ok(())
    }

    /// Record a mutual friendship between two users
    ///
    /// Both friend sets are updated together; befriending twice is a no-op.
    pub async fn add_friends(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        self.require_user(user_id).await?;
        self.require_user(friend_id).await?;
        self.friendships.add(user_id, friend_id).await?;
        info!(user_id, friend_id, "Friendship added");
        Ok(())
    }

    /// Remove a mutual friendship between two users
    ///
    /// Removing a non-existent friendship is a no-op.
    pub async fn remove_friends(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        self.require_user(user_id).await?;
        self.require_user(friend_id).await?;
        self.friendships.remove(user_id, friend_id).await?;
        info!(user_id, friend_id, "Friendship removed");
        Ok(())
    }

    /// The given user's friends as full user records
    pub async fn friends(&self, user_id: i64) -> Result<Vec<User>, AppError> {
        self.require_user(user_id).await?;
        self.friendships.friends_of(user_id).await
    }

    /// Users befriended by both given users
    ///
    /// Empty when either side has no friends.
    pub async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, AppError> {
        self.require_user(user_id).await?;
        self.require_user(other_id).await?;
        self.friendships.common_friends(user_id, other_id).await
    }

    async fn require_user(&self, id: i64) -> Result<User, AppError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "user", id })
    }
}
