//! MPA rating API endpoints

use crate::domain::models::Mpa;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};

/// GET /mpa - List all rating categories
pub async fn list_mpa(State(state): State<AppState>) -> Result<Json<Vec<Mpa>>, AppError> {
    Ok(Json(state.mpa.list().await?))
}

/// GET /mpa/:id - Get a specific rating category
pub async fn get_mpa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Mpa>, AppError> {
    Ok(Json(state.mpa.get(id).await?))
}
