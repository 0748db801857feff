//! Film API endpoints
//!
//! Handles HTTP requests for film CRUD, likes, and the popularity ranking.

use crate::api::MessageResponse;
use crate::domain::models::{Film, NewFilm, User};
use crate::error::AppError;
use crate::services::films::DEFAULT_POPULAR_COUNT;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

/// Request to replace an existing film; the body carries the id
#[derive(Debug, Deserialize)]
pub struct UpdateFilmRequest {
    /// Id of the film being replaced
    pub id: i64,
    /// Replacement fields
    #[serde(flatten)]
    pub film: NewFilm,
}

/// Query parameters for the popularity ranking
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    /// Maximum number of films to return (default 10)
    pub count: Option<i64>,
}

/// GET /films - List all films
pub async fn list_films(State(state): State<AppState>) -> Result<Json<Vec<Film>>, AppError> {
    Ok(Json(state.films.list_films().await?))
}

/// POST /films - Create a new film
pub async fn create_film(
    State(state): State<AppState>,
    Json(request): Json<NewFilm>,
) -> Result<(StatusCode, Json<Film>), AppError> {
    let film = state.films.create_film(request).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

/// PUT /films - Replace an existing film
pub async fn update_film(
    State(state): State<AppState>,
    Json(request): Json<UpdateFilmRequest>,
) -> Result<Json<Film>, AppError> {
    Ok(Json(state.films.update_film(request.id, request.film).await?))
}

/// GET /films/:id - Get a specific film
pub async fn get_film(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Film>, AppError> {
    Ok(Json(state.films.get_film(id).await?))
}

/// DELETE /films/:id - Delete a film
pub async fn delete_film(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.films.delete_film(id).await?;
    Ok(Json(MessageResponse::ok("Film deleted successfully")))
}

/// PUT /films/:id/like/:user_id - Like a film, returning its likers
pub async fn add_like(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.films.add_like(id, user_id).await?))
}

/// DELETE /films/:id/like/:user_id - Unlike a film, returning its likers
pub async fn remove_like(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.films.remove_like(id, user_id).await?))
}

/// GET /films/popular?count=N - Most-liked films
pub async fn popular_films(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<Vec<Film>>, AppError> {
    let count = query.count.unwrap_or(DEFAULT_POPULAR_COUNT);
    Ok(Json(state.films.popular_films(count).await?))
}
