//! MPA rating lookup service
//!
//! Existence-checked read-only access to the seeded rating categories.

use crate::domain::models::Mpa;
use crate::error::AppError;
use crate::storage::MpaRepository;
use std::sync::Arc;

/// Rating category lookups
#[derive(Clone)]
pub struct MpaService {
    mpa: Arc<dyn MpaRepository>,
}

impl MpaService {
    /// Create a service over the given repository
    pub fn new(mpa: Arc<dyn MpaRepository>) -> Self {
        Self { mpa }
    }

    /// All rating categories, ordered by id
    pub async fn list(&self) -> Result<Vec<Mpa>, AppError> {
        self.mpa.get_all().await
    }

    /// A single rating category
    pub async fn get(&self, id: i64) -> Result<Mpa, AppError> {
        self.mpa
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "mpa", id })
    }
}
