//! In-memory store
//!
//! Map-backed implementation of the repository traits, used by the
//! service-level tests. Every query returns independent snapshots, so
//! callers can never alias internal state, and each table owns its id
//! counter — the same allocation contract the SQLite store gets from
//! rowids.

use crate::domain::models::{FilmGenre, FilmRow, Genre, Mpa, NewFilm, NewUser, User};
use crate::error::AppError;
use crate::storage::{
    FilmGenreRepository, FilmRepository, FriendshipRepository, GenreRepository, MpaRepository,
    UserRepository,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

/// Seeded genre reference rows, matching the SQL migration
const GENRE_SEED: [(i64, &str); 6] = [
    (1, "Comedy"),
    (2, "Drama"),
    (3, "Animation"),
    (4, "Thriller"),
    (5, "Documentary"),
    (6, "Action"),
];

/// Seeded MPA reference rows, matching the SQL migration
const MPA_SEED: [(i64, &str); 5] = [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")];

#[derive(Debug, Default)]
struct Tables {
    films: BTreeMap<i64, FilmRow>,
    users: BTreeMap<i64, User>,
    genres: BTreeMap<i64, Genre>,
    mpa: BTreeMap<i64, Mpa>,
    /// (film_id, user_id)
    likes: BTreeSet<(i64, i64)>,
    /// (film_id, genre_id)
    film_genres: BTreeSet<(i64, i64)>,
    /// (user_id, friend_id); symmetric, both directions present
    friends: BTreeSet<(i64, i64)>,
    next_film_id: i64,
    next_user_id: i64,
}

/// In-memory store implementing every repository trait
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a store seeded with the genre and MPA reference rows
    pub fn new() -> Self {
        let mut tables = Tables {
            next_film_id: 1,
            next_user_id: 1,
            ..Tables::default()
        };
        for (id, name) in GENRE_SEED {
            tables.genres.insert(
                id,
                Genre {
                    id,
                    name: name.to_string(),
                },
            );
        }
        for (id, name) in MPA_SEED {
            tables.mpa.insert(
                id,
                Mpa {
                    id,
                    name: name.to_string(),
                },
            );
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilmRepository for MemoryStore {
    async fn get_all(&self) -> Result<Vec<FilmRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.films.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FilmRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.films.get(&id).cloned())
    }

    async fn create(&self, film: &NewFilm) -> Result<FilmRow, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_film_id;
        tables.next_film_id += 1;
        let row = FilmRow {
            id,
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            duration: film.duration,
            rate: film.rate,
            mpa_id: film.mpa_id,
        };
        tables.films.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, film: &NewFilm) -> Result<FilmRow, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.films.contains_key(&id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "update of missing film {}",
                id
            )));
        }
        let row = FilmRow {
            id,
            name: film.name.clone(),
            description: film.description.clone(),
            release_date: film.release_date,
            duration: film.duration,
            rate: film.rate,
            mpa_id: film.mpa_id,
        };
        tables.films.insert(id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.films.remove(&id);
        tables.likes.retain(|&(film_id, _)| film_id != id);
        tables.film_genres.retain(|&(film_id, _)| film_id != id);
        Ok(())
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.likes.insert((film_id, user_id));
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.likes.remove(&(film_id, user_id));
        Ok(())
    }

    async fn likers(&self, film_id: i64) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter(|&&(f, _)| f == film_id)
            .filter_map(|&(_, user_id)| tables.users.get(&user_id).cloned())
            .collect())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<FilmRow>, AppError> {
        let tables = self.tables.read().await;
        let mut ranked: Vec<(usize, FilmRow)> = tables
            .films
            .values()
            .map(|row| {
                let count = tables.likes.iter().filter(|&&(f, _)| f == row.id).count();
                (count, row.clone())
            })
            .collect();
        ranked.sort_by(|(count_a, row_a), (count_b, row_b)| {
            count_b.cmp(count_a).then(row_a.id.cmp(&row_b.id))
        });
        Ok(ranked
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(_, row)| row)
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_all(&self) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_user_id;
        tables.next_user_id += 1;
        let stored = User {
            id,
            email: user.email.clone(),
            login: user.login.clone(),
            name: user.name.clone(),
            birthday: user.birthday,
        };
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, user: &NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "update of missing user {}",
                id
            )));
        }
        let stored = User {
            id,
            email: user.email.clone(),
            login: user.login.clone(),
            name: user.name.clone(),
            birthday: user.birthday,
        };
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id);
        tables.likes.retain(|&(_, user_id)| user_id != id);
        tables
            .friends
            .retain(|&(user_id, friend_id)| user_id != id && friend_id != id);
        Ok(())
    }
}

#[async_trait]
impl FriendshipRepository for MemoryStore {
    async fn add(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.friends.insert((user_id, friend_id));
        tables.friends.insert((friend_id, user_id));
        Ok(())
    }

    async fn remove(&self, user_id: i64, friend_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.friends.remove(&(user_id, friend_id));
        tables.friends.remove(&(friend_id, user_id));
        Ok(())
    }

    async fn friends_of(&self, user_id: i64) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .friends
            .iter()
            .filter(|&&(u, _)| u == user_id)
            .filter_map(|&(_, friend_id)| tables.users.get(&friend_id).cloned())
            .collect())
    }

    async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        let friends_of = |id: i64| -> BTreeSet<i64> {
            tables
                .friends
                .iter()
                .filter(|&&(u, _)| u == id)
                .map(|&(_, friend_id)| friend_id)
                .collect()
        };
        let mine = friends_of(user_id);
        let theirs = friends_of(other_id);
        Ok(mine
            .intersection(&theirs)
            .filter_map(|friend_id| tables.users.get(friend_id).cloned())
            .collect())
    }
}

#[async_trait]
impl FilmGenreRepository for MemoryStore {
    async fn add(&self, film_id: i64, genre_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.film_genres.insert((film_id, genre_id));
        Ok(())
    }

    async fn remove_all(&self, film_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.film_genres.retain(|&(f, _)| f != film_id);
        Ok(())
    }

    async fn genres_of(&self, film_id: i64) -> Result<Vec<FilmGenre>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .film_genres
            .iter()
            .filter(|&&(f, _)| f == film_id)
            .map(|&(film_id, genre_id)| FilmGenre { film_id, genre_id })
            .collect())
    }
}

#[async_trait]
impl GenreRepository for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Genre>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.genres.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Genre>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.genres.get(&id).cloned())
    }
}

#[async_trait]
impl MpaRepository for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Mpa>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.mpa.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Mpa>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.mpa.get(&id).cloned())
    }
}
