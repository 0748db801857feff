//! SQLite store round-trip tests
//!
//! These tests open a store on a temporary file and verify:
//! 1. Migration and reference-data seeding
//! 2. Id assignment and full field round trips
//! 3. Idempotent likes and symmetric friendships at the SQL level
//! 4. Foreign-key cascades on film and user deletion

use chrono::NaiveDate;
use cinetrack_backend::domain::models::{NewFilm, NewUser};
use cinetrack_backend::error::AppError;
use cinetrack_backend::state::AppState;
use cinetrack_backend::storage::sqlite::SqliteStore;
use cinetrack_backend::storage::{FilmGenreRepository, FilmRepository, FriendshipRepository};
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to create a store on a fresh temporary database
///
/// The TempDir must stay alive for the duration of the test.
async fn open_store(dir: &TempDir) -> Arc<SqliteStore> {
    let path = dir.path().join("catalog.db");
    let store = SqliteStore::new(path.to_str().unwrap()).await.unwrap();
    Arc::new(store)
}

fn new_film(name: &str) -> NewFilm {
    NewFilm {
        name: name.to_string(),
        description: "A film".to_string(),
        release_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        duration: 120,
        rate: None,
        mpa_id: None,
        genre_ids: vec![],
    }
}

fn new_user(login: &str) -> NewUser {
    NewUser {
        email: format!("{}@example.com", login),
        login: login.to_string(),
        name: login.to_string(),
        birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    }
}

#[tokio::test]
#[serial]
async fn migrations_seed_reference_data() {
    let dir = TempDir::new().unwrap();
    let state = AppState::from_store(open_store(&dir).await);

    let genres = state.genres.list().await.unwrap();
    assert_eq!(genres.len(), 6);
    assert_eq!(state.genres.get(1).await.unwrap().name, "Comedy");

    let ratings = state.mpa.list().await.unwrap();
    assert_eq!(ratings.len(), 5);
    assert_eq!(state.mpa.get(5).await.unwrap().name, "NC-17");

    assert!(matches!(
        state.genres.get(99).await,
        Err(AppError::NotFound {
            entity: "genre",
            id: 99
        })
    ));
}

#[tokio::test]
#[serial]
async fn film_fields_round_trip_and_ids_increase() {
    let dir = TempDir::new().unwrap();
    let state = AppState::from_store(open_store(&dir).await);

    let mut request = new_film("Metropolis");
    request.description = "A futurist dystopia".to_string();
    request.release_date = NaiveDate::from_ymd_opt(1927, 1, 10).unwrap();
    request.duration = 153;
    request.rate = Some(4);
    request.mpa_id = Some(2);
    request.genre_ids = vec![2, 4];

    let first = state.films.create_film(request).await.unwrap();
    let second = state.films.create_film(new_film("Sunrise")).await.unwrap();
    assert!(second.id > first.id);

    let fetched = state.films.get_film(first.id).await.unwrap();
    assert_eq!(fetched.name, "Metropolis");
    assert_eq!(fetched.description, "A futurist dystopia");
    assert_eq!(
        fetched.release_date,
        NaiveDate::from_ymd_opt(1927, 1, 10).unwrap()
    );
    assert_eq!(fetched.duration, 153);
    assert_eq!(fetched.rate, Some(4));
    assert_eq!(fetched.mpa.unwrap().name, "PG");
    let genre_ids: Vec<i64> = fetched.genres.iter().map(|g| g.id).collect();
    assert_eq!(genre_ids, vec![2, 4]);
}

#[tokio::test]
#[serial]
async fn user_fields_round_trip() {
    let dir = TempDir::new().unwrap();
    let state = AppState::from_store(open_store(&dir).await);

    let created = state.users.create_user(new_user("alice")).await.unwrap();
    let fetched = state.users.get_user(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.birthday, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
}

#[tokio::test]
#[serial]
async fn likes_are_idempotent_in_sql() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let state = AppState::from_store(store.clone());

    let film = state.films.create_film(new_film("Liked")).await.unwrap();
    let user = state.users.create_user(new_user("alice")).await.unwrap();

    let film_repo: &dyn FilmRepository = store.as_ref();
    film_repo.add_like(film.id, user.id).await.unwrap();
    film_repo.add_like(film.id, user.id).await.unwrap();

    assert_eq!(film_repo.likers(film.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn update_film_relinks_genres() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let state = AppState::from_store(store.clone());

    let mut request = new_film("Working Title");
    request.genre_ids = vec![1, 2];
    let created = state.films.create_film(request).await.unwrap();

    let mut replacement = new_film("Final Title");
    replacement.genre_ids = vec![3];
    state
        .films
        .update_film(created.id, replacement)
        .await
        .unwrap();

    let links: &dyn FilmGenreRepository = store.as_ref();
    let remaining = links.genres_of(created.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].genre_id, 3);
}

#[tokio::test]
#[serial]
async fn delete_film_cascades_likes_and_genre_links() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let state = AppState::from_store(store.clone());

    let mut request = new_film("Doomed");
    request.genre_ids = vec![1];
    let film = state.films.create_film(request).await.unwrap();
    let user = state.users.create_user(new_user("alice")).await.unwrap();
    state.films.add_like(film.id, user.id).await.unwrap();

    state.films.delete_film(film.id).await.unwrap();

    let film_repo: &dyn FilmRepository = store.as_ref();
    let links: &dyn FilmGenreRepository = store.as_ref();
    assert!(film_repo.likers(film.id).await.unwrap().is_empty());
    assert!(links.genres_of(film.id).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn delete_user_cascades_likes_and_friendships() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let state = AppState::from_store(store.clone());

    let film = state.films.create_film(new_film("Liked")).await.unwrap();
    let alice = state.users.create_user(new_user("alice")).await.unwrap();
    let bob = state.users.create_user(new_user("bob")).await.unwrap();

    state.films.add_like(film.id, alice.id).await.unwrap();
    state.users.add_friends(alice.id, bob.id).await.unwrap();

    state.users.delete_user(alice.id).await.unwrap();

    let film_repo: &dyn FilmRepository = store.as_ref();
    let friendships: &dyn FriendshipRepository = store.as_ref();
    assert!(film_repo.likers(film.id).await.unwrap().is_empty());
    assert!(friendships.friends_of(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn friendship_rows_are_written_both_ways() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let state = AppState::from_store(store.clone());

    let alice = state.users.create_user(new_user("alice")).await.unwrap();
    let bob = state.users.create_user(new_user("bob")).await.unwrap();

    state.users.add_friends(alice.id, bob.id).await.unwrap();

    let friendships: &dyn FriendshipRepository = store.as_ref();
    assert_eq!(friendships.friends_of(alice.id).await.unwrap()[0].id, bob.id);
    assert_eq!(friendships.friends_of(bob.id).await.unwrap()[0].id, alice.id);
}

#[tokio::test]
#[serial]
async fn popular_ranking_orders_by_like_count() {
    let dir = TempDir::new().unwrap();
    let state = AppState::from_store(open_store(&dir).await);

    let zero = state.films.create_film(new_film("Zero")).await.unwrap();
    let two = state.films.create_film(new_film("Two")).await.unwrap();
    let one = state.films.create_film(new_film("One")).await.unwrap();

    let alice = state.users.create_user(new_user("alice")).await.unwrap();
    let bob = state.users.create_user(new_user("bob")).await.unwrap();

    state.films.add_like(two.id, alice.id).await.unwrap();
    state.films.add_like(two.id, bob.id).await.unwrap();
    state.films.add_like(one.id, alice.id).await.unwrap();

    let ranked = state.films.popular_films(2).await.unwrap();
    let ids: Vec<i64> = ranked.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![two.id, one.id]);

    let all = state.films.popular_films(10).await.unwrap();
    assert_eq!(all.last().unwrap().id, zero.id);
}
