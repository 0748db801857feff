//! User API endpoints
//!
//! Handles HTTP requests for user CRUD and friendship management.

use crate::api::MessageResponse;
use crate::domain::models::{NewUser, User};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

/// Request to replace an existing user; the body carries the id
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// Id of the user being replaced
    pub id: i64,
    /// Replacement fields
    #[serde(flatten)]
    pub user: NewUser,
}

/// GET /users - List all users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list_users().await?))
}

/// POST /users - Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users - Replace an existing user
pub async fn update_user(
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.update_user(request.id, request.user).await?))
}

/// GET /users/:id - Get a specific user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.get_user(id).await?))
}

/// DELETE /users/:id - Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.users.delete_user(id).await?;
    Ok(Json(MessageResponse::ok("User deleted successfully")))
}

/// PUT /users/:id/friends/:friend_id - Befriend two users
pub async fn add_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    state.users.add_friends(id, friend_id).await?;
    Ok(Json(MessageResponse::ok("Friendship added")))
}

/// DELETE /users/:id/friends/:friend_id - Unfriend two users
pub async fn remove_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    state.users.remove_friends(id, friend_id).await?;
    Ok(Json(MessageResponse::ok("Friendship removed")))
}

/// GET /users/:id/friends - A user's friends
pub async fn friends(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.friends(id).await?))
}

/// GET /users/:id/friends/common/:other_id - Friends shared by two users
pub async fn common_friends(
    State(state): State<AppState>,
    Path((id, other_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.common_friends(id, other_id).await?))
}
