//! Domain data models
//!
//! Defines structures for films, users, and the reference entities
//! (genres, MPA rating categories) films point at.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An MPA rating category
///
/// Static reference data seeded by the migration; read-only at the
/// service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Mpa {
    /// Rating category identifier
    pub id: i64,
    /// Rating name, e.g. "PG-13"
    pub name: String,
}

/// A film genre
///
/// Static reference data seeded by the migration; read-only at the
/// service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    /// Genre identifier
    pub id: i64,
    /// Genre name, e.g. "Drama"
    pub name: String,
}

/// A film as stored
///
/// Carries the raw `mpa_id` foreign key; the service layer resolves it and
/// the genre links into a full [`Film`] before returning it to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FilmRow {
    /// Unique identifier, assigned by the store on create
    pub id: i64,
    /// Film title
    pub name: String,
    /// Plot description, at most 200 characters
    pub description: String,
    /// Release date, no earlier than 1895-12-28
    pub release_date: NaiveDate,
    /// Running time in minutes
    pub duration: i64,
    /// Optional aggregate rate value
    pub rate: Option<i64>,
    /// Optional MPA rating category id
    pub mpa_id: Option<i64>,
}

/// A film as returned to callers, with rating and genres resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    /// Unique identifier, assigned by the store on create
    pub id: i64,
    /// Film title
    pub name: String,
    /// Plot description, at most 200 characters
    pub description: String,
    /// Release date, no earlier than 1895-12-28
    pub release_date: NaiveDate,
    /// Running time in minutes
    pub duration: i64,
    /// Optional aggregate rate value
    pub rate: Option<i64>,
    /// Resolved MPA rating category, if the film has one
    pub mpa: Option<Mpa>,
    /// Resolved genres, unique by id
    pub genres: Vec<Genre>,
}

impl Film {
    /// Assemble a full film from its stored row and resolved references
    pub fn from_row(row: FilmRow, mpa: Option<Mpa>, genres: Vec<Genre>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            release_date: row.release_date,
            duration: row.duration,
            rate: row.rate,
            mpa,
            genres,
        }
    }
}

/// Fields for creating or replacing a film
///
/// The store assigns the id; genre and rating references arrive as raw ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFilm {
    /// Film title
    pub name: String,
    /// Plot description, at most 200 characters
    #[serde(default)]
    pub description: String,
    /// Release date, no earlier than 1895-12-28
    pub release_date: NaiveDate,
    /// Running time in minutes
    pub duration: i64,
    /// Optional aggregate rate value
    #[serde(default)]
    pub rate: Option<i64>,
    /// Optional MPA rating category id
    #[serde(default)]
    pub mpa_id: Option<i64>,
    /// Genre ids to link; duplicates are collapsed
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique identifier, assigned by the store on create
    pub id: i64,
    /// Email address, must contain '@'
    pub email: String,
    /// Login handle, non-empty and free of spaces
    pub login: String,
    /// Display name; equals the login when none was supplied
    pub name: String,
    /// Date of birth, never in the future
    pub birthday: NaiveDate,
}

/// Fields for creating or replacing a user
///
/// The store assigns the id. An empty `name` is replaced with the login
/// during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address, must contain '@'
    pub email: String,
    /// Login handle, non-empty and free of spaces
    pub login: String,
    /// Display name; may be empty
    #[serde(default)]
    pub name: String,
    /// Date of birth, never in the future
    pub birthday: NaiveDate,
}

/// A film-to-genre link
///
/// Join row with no lifecycle of its own beyond the film's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FilmGenre {
    /// Id of the linked film
    pub film_id: i64,
    /// Id of the linked genre
    pub genre_id: i64,
}
