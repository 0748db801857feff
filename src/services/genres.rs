//! Genre lookup service
//!
//! Existence-checked read-only access to the seeded genre reference data.

use crate::domain::models::Genre;
use crate::error::AppError;
use crate::storage::GenreRepository;
use std::sync::Arc;

/// Genre reference lookups
#[derive(Clone)]
pub struct GenreService {
    genres: Arc<dyn GenreRepository>,
}

impl GenreService {
    /// Create a service over the given repository
    pub fn new(genres: Arc<dyn GenreRepository>) -> Self {
        Self { genres }
    }

    /// All genres, ordered by id
    pub async fn list(&self) -> Result<Vec<Genre>, AppError> {
        self.genres.get_all().await
    }

    /// A single genre
    pub async fn get(&self, id: i64) -> Result<Genre, AppError> {
        self.genres.get_by_id(id).await?.ok_or(AppError::NotFound {
            entity: "genre",
            id,
        })
    }
}
