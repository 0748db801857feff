//! SQLite-backed store
//!
//! Handles all database interactions for films, users, and their
//! relations. Ids are assigned by SQLite rowid allocation; cascading
//! deletes are enforced by foreign keys so removal of a film or user is
//! atomic at this boundary.

use crate::domain::models::{FilmGenre, FilmRow, Genre, Mpa, NewFilm, NewUser, User};
use crate::error::AppError;
use crate::storage::{
    FilmGenreRepository, FilmRepository, FriendshipRepository, GenreRepository, MpaRepository,
    UserRepository,
};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Database connection pool for catalog operations
///
/// Implements every repository trait, so one store instance can back all
/// services.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(SqliteStore)` if successful
    /// * `Err(AppError)` if connection failed
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Ensure parent directory exists
        if let Some(parent) = PathBuf::from(db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
            })?;
        }

        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_path);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_catalog.sql");

        // Remove comments (lines starting with --) and normalize whitespace
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = if let Some(comment_pos) = trimmed.find("--") {
                &trimmed[..comment_pos]
            } else {
                trimmed
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        // Split by semicolon and filter out empty statements
        let statements: Vec<&str> = cleaned_sql
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database pool (for advanced operations if needed)
    #[allow(dead_code)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl FilmRepository for SqliteStore {
    async fn get_all(&self) -> Result<Vec<FilmRow>, AppError> {
        let films = sqlx::query_as::<_, FilmRow>(
            "SELECT id, name, description, release_date, duration, rate, mpa_id \
             FROM films ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch films: {}", e)))?;

        Ok(films)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FilmRow>, AppError> {
        let film = sqlx::query_as::<_, FilmRow>(
            "SELECT id, name, description, release_date, duration, rate, mpa_id \
             FROM films WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch film: {}", e)))?;

        Ok(film)
    }

    async fn create(&self, film: &NewFilm) -> Result<FilmRow, AppError> {
        let result = sqlx::query(
            "INSERT INTO films (name, description, release_date, duration, rate, mpa_id) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.rate)
        .bind(film.mpa_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create film: {}", e)))?;

        let id = result.last_insert_rowid();
        debug!("Created film: {}", id);

        Ok(FilmRow {
            id,
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            duration: film.duration,
            rate: film.rate,
            mpa_id: film.mpa_id,
        })
    }

    async fn update(&self, id: i64, film: &NewFilm) -> Result<FilmRow, AppError> {
        sqlx::query(
            "UPDATE films SET name = ?, description = ?, release_date = ?, duration = ?, \
             rate = ?, mpa_id = ? WHERE id = ?",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.rate)
        .bind(film.mpa_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to update film: {}", e)))?;

        debug!("Updated film: {}", id);

        Ok(FilmRow {
            id,
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            duration: film.duration,
            rate: film.rate,
            mpa_id: film.mpa_id,
        })
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM films WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to delete film: {}", e)))?;

        debug!("Deleted film: {}", id);
        Ok(())
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO likes (film_id, user_id) VALUES (?, ?)")
            .bind(film_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to add like: {}", e)))?;

        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM likes WHERE film_id = ? AND user_id = ?")
            .bind(film_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to remove like: {}", e)))?;

        Ok(())
    }

    async fn likers(&self, film_id: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u \
             JOIN likes l ON l.user_id = u.id \
             WHERE l.film_id = ? ORDER BY u.id",
        )
        .bind(film_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch likers: {}", e)))?;

        Ok(users)
    }

    async fn popular(&self, limit: i64) -> Result<Vec<FilmRow>, AppError> {
        let films = sqlx::query_as::<_, FilmRow>(
            "SELECT f.id, f.name, f.description, f.release_date, f.duration, f.rate, f.mpa_id \
             FROM films f LEFT JOIN likes l ON f.id = l.film_id \
             GROUP BY f.id \
             ORDER BY COUNT(l.user_id) DESC, f.id ASC \
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch popular films: {}", e)))?;

        Ok(films)
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn get_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, login, name, birthday FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch users: {}", e)))?;

        Ok(users)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, login, name, birthday FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch user: {}", e)))?;

        Ok(user)
    }

    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (email, login, name, birthday) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create user: {}", e)))?;

        let id = result.last_insert_rowid();
        debug!("Created user: {}", id);

        Ok(User {
            id,
            email: user.email.clone(),
            login: user.login.clone(),
            name: user.name.clone(),
            birthday: user.birthday,
        })
    }

    async fn update(&self, id: i64, user: &NewUser) -> Result<User, AppError> {
        sqlx::query("UPDATE users SET email = ?, login = ?, name = ?, birthday = ? WHERE id = ?")
            .bind(&user.email)
            .bind(&user.login)
            .bind(&user.name)
            .bind(user.birthday)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to update user: {}", e)))?;

        debug!("Updated user: {}", id);

        Ok(User {
            id,
            email: user.email.clone(),
            login: user.login.clone(),
            name: user.name.clone(),
            birthday: user.birthday,
        })
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to delete user: {}", e)))?;

        debug!("Deleted user: {}", id);
        Ok(())
    }
}

#[async_trait]
impl FriendshipRepository for SqliteStore {
    async fn add(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        // Both directions in one transaction keeps the relation symmetric
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query("INSERT OR IGNORE INTO friendship (user_id, friend_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(friend_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to add friendship: {}", e)))?;

        sqlx::query("INSERT OR IGNORE INTO friendship (user_id, friend_id) VALUES (?, ?)")
            .bind(friend_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to add friendship: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to commit friendship: {}", e))
        })?;

        debug!("Users {} and {} are now friends", user_id, friend_id);
        Ok(())
    }

    async fn remove(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            "DELETE FROM friendship WHERE (user_id = ? AND friend_id = ?) \
             OR (user_id = ? AND friend_id = ?)",
        )
        .bind(user_id)
        .bind(friend_id)
        .bind(friend_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to remove friendship: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to commit friendship removal: {}", e))
        })?;

        debug!("Users {} and {} are no longer friends", user_id, friend_id);
        Ok(())
    }

    async fn friends_of(&self, user_id: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u \
             JOIN friendship f ON f.friend_id = u.id \
             WHERE f.user_id = ? ORDER BY u.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch friends: {}", e)))?;

        Ok(users)
    }

    async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.login, u.name, u.birthday FROM users u \
             JOIN friendship f1 ON f1.friend_id = u.id \
             JOIN friendship f2 ON f2.friend_id = u.id \
             WHERE f1.user_id = ? AND f2.user_id = ? ORDER BY u.id",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to fetch common friends: {}", e))
        })?;

        Ok(users)
    }
}

#[async_trait]
impl FilmGenreRepository for SqliteStore {
    async fn add(&self, film_id: i64, genre_id: i64) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO films_genres (film_id, genre_id) VALUES (?, ?)")
            .bind(film_id)
            .bind(genre_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to link genre: {}", e))
            })?;

        Ok(())
    }

    async fn remove_all(&self, film_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM films_genres WHERE film_id = ?")
            .bind(film_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to unlink genres: {}", e))
            })?;

        Ok(())
    }

    async fn genres_of(&self, film_id: i64) -> Result<Vec<FilmGenre>, AppError> {
        let links = sqlx::query_as::<_, FilmGenre>(
            "SELECT film_id, genre_id FROM films_genres WHERE film_id = ? ORDER BY genre_id",
        )
        .bind(film_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch genre links: {}", e)))?;

        Ok(links)
    }
}

#[async_trait]
impl GenreRepository for SqliteStore {
    async fn get_all(&self) -> Result<Vec<Genre>, AppError> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch genres: {}", e)))?;

        Ok(genres)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Genre>, AppError> {
        let genre = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch genre: {}", e)))?;

        Ok(genre)
    }
}

#[async_trait]
impl MpaRepository for SqliteStore {
    async fn get_all(&self) -> Result<Vec<Mpa>, AppError> {
        let ratings = sqlx::query_as::<_, Mpa>("SELECT id, name FROM mpa ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch ratings: {}", e)))?;

        Ok(ratings)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Mpa>, AppError> {
        let rating = sqlx::query_as::<_, Mpa>("SELECT id, name FROM mpa WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch rating: {}", e)))?;

        Ok(rating)
    }
}
