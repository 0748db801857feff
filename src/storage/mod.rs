//! Persistence layer: repository traits and their implementations
//!
//! Services depend on these traits only. Absence is modelled as `Option`,
//! never an error, so the not-found decision stays with the caller. Two
//! implementations exist: [`sqlite::SqliteStore`] backs the running server,
//! [`memory::MemoryStore`] backs the service-level tests.

pub mod memory;
pub mod sqlite;

use crate::domain::models::{FilmGenre, FilmRow, Genre, Mpa, NewFilm, NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Film table access plus the like relation
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// All stored films
    async fn get_all(&self) -> Result<Vec<FilmRow>, AppError>;
    /// A single film, `None` when the id is unknown
    async fn get_by_id(&self, id: i64) -> Result<Option<FilmRow>, AppError>;
    /// Persist a new film and assign its id
    async fn create(&self, film: &NewFilm) -> Result<FilmRow, AppError>;
    /// Replace the stored fields of an existing film
    async fn update(&self, id: i64, film: &NewFilm) -> Result<FilmRow, AppError>;
    /// Remove a film; its likes and genre links go with it
    async fn delete(&self, id: i64) -> Result<(), AppError>;
    /// Record a like; liking twice is a no-op
    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<(), AppError>;
    /// Remove a like; unliking a non-liker is a no-op
    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<(), AppError>;
    /// Users who like the given film, ordered by id
    async fn likers(&self, film_id: i64) -> Result<Vec<User>, AppError>;
    /// Films ordered by descending like count, ties by ascending id
    async fn popular(&self, limit: i64) -> Result<Vec<FilmRow>, AppError>;
}

/// User table access
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All registered users
    async fn get_all(&self) -> Result<Vec<User>, AppError>;
    /// A single user, `None` when the id is unknown
    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    /// Persist a new user and assign their id
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    /// Replace the stored fields of an existing user
    async fn update(&self, id: i64, user: &NewUser) -> Result<User, AppError>;
    /// Remove a user; their likes and friendships go with them
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// The friendship relation between users
///
/// Friendship is symmetric: both directions are written and removed
/// together.
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Record a friendship in both directions; repeating is a no-op
    async fn add(&self, user_id: i64, friend_id: i64) -> Result<(), AppError>;
    /// Remove a friendship in both directions; removing a non-friend is a no-op
    async fn remove(&self, user_id: i64, friend_id: i64) -> Result<(), AppError>;
    /// The given user's friends, ordered by id
    async fn friends_of(&self, user_id: i64) -> Result<Vec<User>, AppError>;
    /// Users befriended by both given users, ordered by id
    async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, AppError>;
}

/// The film-to-genre join relation
#[async_trait]
pub trait FilmGenreRepository: Send + Sync {
    /// Link a genre to a film; repeating is a no-op
    async fn add(&self, film_id: i64, genre_id: i64) -> Result<(), AppError>;
    /// Remove every genre link of the given film
    async fn remove_all(&self, film_id: i64) -> Result<(), AppError>;
    /// All genre links of the given film
    async fn genres_of(&self, film_id: i64) -> Result<Vec<FilmGenre>, AppError>;
}

/// Read-only access to the seeded genre reference data
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres, ordered by id
    async fn get_all(&self) -> Result<Vec<Genre>, AppError>;
    /// A single genre, `None` when the id is unknown
    async fn get_by_id(&self, id: i64) -> Result<Option<Genre>, AppError>;
}

/// Read-only access to the seeded MPA rating reference data
#[async_trait]
pub trait MpaRepository: Send + Sync {
    /// All rating categories, ordered by id
    async fn get_all(&self) -> Result<Vec<Mpa>, AppError>;
    /// A single rating category, `None` when the id is unknown
    async fn get_by_id(&self, id: i64) -> Result<Option<Mpa>, AppError>;
}
