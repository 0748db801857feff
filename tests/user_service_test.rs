//! Integration tests for the user service
//!
//! These tests run against the in-memory store and verify:
//! 1. Field validation and the login-as-name fallback
//! 2. Symmetric friendship add/remove
//! 3. Common-friends intersection
//! 4. Not-found discipline and delete cascades

use chrono::NaiveDate;
use cinetrack_backend::domain::models::NewUser;
use cinetrack_backend::error::AppError;
use cinetrack_backend::services::UserService;
use cinetrack_backend::storage::memory::MemoryStore;
use std::sync::Arc;

fn user_service() -> UserService {
    let store = Arc::new(MemoryStore::new());
    UserService::new(store.clone(), store)
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
async fn create_defaults_empty_name_to_login() {
    let users = user_service();

    let created = users
        .create_user(NewUser {
            email: "a@b.com".to_string(),
            login: "bob".to_string(),
            name: String::new(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(created.name, "bob");
    assert_eq!(created.id, 1);
}

#[tokio::test]
async fn create_rejects_invalid_fields_without_mutation() {
    let users = user_service();

    let mut bad_email = new_user("alice");
    bad_email.email = "not-an-email".to_string();
    assert!(matches!(
        users.create_user(bad_email).await,
        Err(AppError::Validation(_))
    ));

    let mut spaced_login = new_user("alice");
    spaced_login.login = "al ice".to_string();
    assert!(matches!(
        users.create_user(spaced_login).await,
        Err(AppError::Validation(_))
    ));

    let mut unborn = new_user("alice");
    unborn.birthday = chrono::Utc::now().date_naive() + chrono::Days::new(1);
    assert!(matches!(
        users.create_user(unborn).await,
        Err(AppError::Validation(_))
    ));

    assert!(users.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_and_update_unknown_user_is_not_found() {
    let users = user_service();

    assert!(matches!(
        users.get_user(5).await,
        Err(AppError::NotFound {
            entity: "user",
            id: 5
        })
    ));
    assert!(matches!(
        users.update_user(5, new_user("ghost")).await,
        Err(AppError::NotFound {
            entity: "user",
            id: 5
        })
    ));
    assert!(users.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_stored_fields() {
    let users = user_service();
    let created = users.create_user(new_user("alice")).await.unwrap();

    let mut replacement = new_user("alice");
    replacement.name = "Alice A.".to_string();
    let updated = users.update_user(created.id, replacement).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Alice A.");
    assert_eq!(users.get_user(created.id).await.unwrap().name, "Alice A.");
}

#[tokio::test]
async fn friendship_is_symmetric() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();
    let bob = users.create_user(new_user("bob")).await.unwrap();

    users.add_friends(alice.id, bob.id).await.unwrap();

    let alices_friends = users.friends(alice.id).await.unwrap();
    let bobs_friends = users.friends(bob.id).await.unwrap();
    assert!(alices_friends.iter().any(|u| u.id == bob.id));
    assert!(bobs_friends.iter().any(|u| u.id == alice.id));
}

#[tokio::test]
async fn remove_friends_removes_both_directions() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();
    let bob = users.create_user(new_user("bob")).await.unwrap();

    users.add_friends(alice.id, bob.id).await.unwrap();
    users.remove_friends(bob.id, alice.id).await.unwrap();

    assert!(users.friends(alice.id).await.unwrap().is_empty());
    assert!(users.friends(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn befriending_twice_is_a_no_op() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();
    let bob = users.create_user(new_user("bob")).await.unwrap();

    users.add_friends(alice.id, bob.id).await.unwrap();
    users.add_friends(alice.id, bob.id).await.unwrap();

    assert_eq!(users.friends(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn common_friends_is_the_intersection() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();
    let bob = users.create_user(new_user("bob")).await.unwrap();
    let carol = users.create_user(new_user("carol")).await.unwrap();
    let dave = users.create_user(new_user("dave")).await.unwrap();

    users.add_friends(alice.id, carol.id).await.unwrap();
    users.add_friends(bob.id, carol.id).await.unwrap();
    users.add_friends(alice.id, dave.id).await.unwrap();

    let common = users.common_friends(alice.id, bob.id).await.unwrap();
    let ids: Vec<i64> = common.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![carol.id]);
}

#[tokio::test]
async fn common_friends_is_empty_when_either_has_none() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();
    let bob = users.create_user(new_user("bob")).await.unwrap();
    let carol = users.create_user(new_user("carol")).await.unwrap();

    users.add_friends(alice.id, carol.id).await.unwrap();

    assert!(users
        .common_friends(alice.id, bob.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn friendship_requires_existing_users() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();

    assert!(matches!(
        users.add_friends(alice.id, 99).await,
        Err(AppError::NotFound {
            entity: "user",
            id: 99
        })
    ));
    assert!(matches!(
        users.add_friends(99, alice.id).await,
        Err(AppError::NotFound {
            entity: "user",
            id: 99
        })
    ));
}

#[tokio::test]
async fn delete_user_cascades_friendships() {
    let users = user_service();
    let alice = users.create_user(new_user("alice")).await.unwrap();
    let bob = users.create_user(new_user("bob")).await.unwrap();

    users.add_friends(alice.id, bob.id).await.unwrap();
    users.delete_user(bob.id).await.unwrap();

    assert!(users.friends(alice.id).await.unwrap().is_empty());
    assert!(matches!(
        users.get_user(bob.id).await,
        Err(AppError::NotFound { entity: "user", .. })
    ));
}
