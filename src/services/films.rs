//! Film catalog service
//!
//! Orchestrates film CRUD, like management, reference-data enrichment,
//! and the popularity ranking. Validation always runs before any
//! repository mutation.

use crate::domain::models::{Film, FilmRow, Genre, NewFilm, User};
use crate::domain::validate;
use crate::error::AppError;
use crate::storage::{
    FilmGenreRepository, FilmRepository, GenreRepository, MpaRepository, UserRepository,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Default number of films returned by the popularity ranking
pub const DEFAULT_POPULAR_COUNT: i64 = 10;

/// Film catalog operations
#[derive(Clone)]
pub struct FilmService {
    films: Arc<dyn FilmRepository>,
    users: Arc<dyn UserRepository>,
    genres: Arc<dyn GenreRepository>,
    mpa: Arc<dyn MpaRepository>,
    film_genres: Arc<dyn FilmGenreRepository>,
}

impl FilmService {
    /// Create a service over the given repositories
    pub fn new(
        films: Arc<dyn FilmRepository>,
        users: Arc<dyn UserRepository>,
        genres: Arc<dyn GenreRepository>,
        mpa: Arc<dyn MpaRepository>,
        film_genres: Arc<dyn FilmGenreRepository>,
    ) -> Self {
        Self {
            films,
            users,
            genres,
            mpa,
            film_genres,
        }
    }

    /// All films, enriched with resolved rating and genre objects
    pub async fn list_films(&self) -> Result<Vec<Film>, AppError> {
        let rows = self.films.get_all().await?;
        let mut films = Vec::with_capacity(rows.len());
        for row in rows {
            films.push(self.enrich(row).await?);
        }
        Ok(films)
    }

    /// Validate and persist a new film, linking its genres
    pub async fn create_film(&self, film: NewFilm) -> Result<Film, AppError> {
        validate::validate_film(&film)?;
        self.require_references(&film).await?;

        let row = self.films.create(&film).await?;
        for genre_id in dedupe(&film.genre_ids) {
            self.film_genres.add(row.id, genre_id).await?;
        }

        info!(film_id = row.id, name = %row.name, "Created film");
        self.enrich(row).await
    }

    /// A single film, enriched
    pub async fn get_film(&self, id: i64) -> Result<Film, AppError> {
        let row = self.require_film(id).await?;
        self.enrich(row).await
    }

    /// Validate and replace an existing film, re-linking its genres
    pub async fn update_film(&self, id: i64, film: NewFilm) -> Result<Film, AppError> {
        validate::validate_film(&film)?;
        self.require_film(id).await?;
        self.require_references(&film).await?;

        let row = self.films.update(id, &film).await?;
        self.film_genres.remove_all(id).await?;
        for genre_id in dedupe(&film.genre_ids) {
            self.film_genres.add(id, genre_id).await?;
        }

        info!(film_id = id, "Updated film");
        self.enrich(row).await
    }

    /// Remove a film together with its likes and genre links
    pub async fn delete_film(&self, id: i64) -> Result<(), AppError> {
        self.require_film(id).await?;
        self.films.delete(id).await?;
        info!(film_id = id, "Deleted film");
        Ok(())
    }

    /// Record a like and return the film's current likers
    ///
    /// Liking twice has the same effect as liking once.
    pub async fn add_like(&self, film_id: i64, user_id: i64) -> Result<Vec<User>, AppError> {
        self.require_film(film_id).await?;
        self.require_user(user_id).await?;
        self.films.add_like(film_id, user_id).await?;
        debug!(film_id, user_id, "Like added");
        self.films.likers(film_id).await
    }

    /// Remove a like and return the film's current likers
    ///
    /// Unliking a non-liker is a no-op.
    pub async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<Vec<User>, AppError> {
        self.require_film(film_id).await?;
        self.require_user(user_id).await?;
        self.films.remove_like(film_id, user_id).await?;
        debug!(film_id, user_id, "Like removed");
        self.films.likers(film_id).await
    }

    /// Films ordered by descending like count, truncated to `count`
    ///
    /// Ties are broken by ascending film id.
    pub async fn popular_films(&self, count: i64) -> Result<Vec<Film>, AppError> {
        // SQLite treats a negative LIMIT as unbounded; clamp before it gets there
        let rows = self.films.popular(count.max(0)).await?;
        let mut films = Vec::with_capacity(rows.len());
        for row in rows {
            films.push(self.enrich(row).await?);
        }
        Ok(films)
    }

    async fn require_film(&self, id: i64) -> Result<FilmRow, AppError> {
        self.films
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "film", id })
    }

    async fn require_user(&self, id: i64) -> Result<User, AppError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "user", id })
    }

    /// Check that every rating and genre id the film references exists
    async fn require_references(&self, film: &NewFilm) -> Result<(), AppError> {
        if let Some(mpa_id) = film.mpa_id {
            self.mpa
                .get_by_id(mpa_id)
                .await?
                .ok_or(AppError::NotFound {
                    entity: "mpa",
                    id: mpa_id,
                })?;
        }
        for &genre_id in &film.genre_ids {
            self.genres
                .get_by_id(genre_id)
                .await?
                .ok_or(AppError::NotFound {
                    entity: "genre",
                    id: genre_id,
                })?;
        }
        Ok(())
    }

    /// Resolve a stored row's rating and genre ids into full objects
    async fn enrich(&self, row: FilmRow) -> Result<Film, AppError> {
        let mpa = match row.mpa_id {
            Some(mpa_id) => Some(self.mpa.get_by_id(mpa_id).await?.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "film {} references unknown rating {}",
                    row.id,
                    mpa_id
                ))
            })?),
            None => None,
        };

        let mut genres: Vec<Genre> = Vec::new();
        for link in self.film_genres.genres_of(row.id).await? {
            if genres.iter().any(|g| g.id == link.genre_id) {
                continue;
            }
            let genre = self.genres.get_by_id(link.genre_id).await?.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "film {} references unknown genre {}",
                    row.id,
                    link.genre_id
                ))
            })?;
            genres.push(genre);
        }

        Ok(Film::from_row(row, mpa, genres))
    }
}

/// First-occurrence dedup, preserving caller order
fn dedupe(ids: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
