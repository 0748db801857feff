//! Genre API endpoints

use crate::domain::models::Genre;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};

/// GET /genres - List all genres
pub async fn list_genres(State(state): State<AppState>) -> Result<Json<Vec<Genre>>, AppError> {
    Ok(Json(state.genres.list().await?))
}

/// GET /genres/:id - Get a specific genre
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Genre>, AppError> {
    Ok(Json(state.genres.get(id).await?))
}
