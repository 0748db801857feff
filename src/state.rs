//! Shared application state
//!
//! Bundles the service handles that are cloned into every request handler.

use crate::services::{FilmService, GenreService, MpaService, UserService};
use crate::storage::{
    FilmGenreRepository, FilmRepository, FriendshipRepository, GenreRepository, MpaRepository,
    UserRepository,
};
use std::sync::Arc;

/// Handles to the service layer, one clone per request
#[derive(Clone)]
pub struct AppState {
    /// Film catalog operations
    pub films: FilmService,
    /// User and friendship operations
    pub users: UserService,
    /// Genre reference lookups
    pub genres: GenreService,
    /// Rating category lookups
    pub mpa: MpaService,
}

impl AppState {
    /// Wire every service to a single store implementing all repository traits
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: FilmRepository
            + UserRepository
            + GenreRepository
            + MpaRepository
            + FilmGenreRepository
            + FriendshipRepository
            + 'static,
    {
        Self {
            films: FilmService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            ),
            users: UserService::new(store.clone(), store.clone()),
            genres: GenreService::new(store.clone()),
            mpa: MpaService::new(store),
        }
    }
}
