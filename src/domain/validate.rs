//! Field validation for client-supplied entities
//!
//! Every check runs before any persistence mutation; a failure leaves
//! state untouched.

use crate::domain::models::{NewFilm, NewUser};
use crate::error::AppError;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

/// Maximum film description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// Earliest allowed release date (the first public film screening)
pub fn earliest_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("valid calendar date")
}

/// Check film fields against the catalog's constraints
///
/// # Returns
/// * `Ok(())` - All fields are valid
/// * `Err(AppError::Validation)` - With the reason for the first violated rule
pub fn validate_film(film: &NewFilm) -> Result<(), AppError> {
    if film.name.is_empty() {
        warn!("Rejected film: empty name");
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if film.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        warn!(name = %film.name, "Rejected film: description too long");
        return Err(AppError::Validation(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    if film.release_date < earliest_release_date() {
        warn!(name = %film.name, release_date = %film.release_date, "Rejected film: release date too early");
        return Err(AppError::Validation(
            "release date must not be before 1895-12-28".to_string(),
        ));
    }
    if film.duration <= 0 {
        warn!(name = %film.name, duration = film.duration, "Rejected film: non-positive duration");
        return Err(AppError::Validation(
            "duration must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Check user fields; an empty display name is replaced with the login
///
/// # Returns
/// * `Ok(())` - All fields are valid (the name may have been rewritten)
/// * `Err(AppError::Validation)` - With the reason for the first violated rule
pub fn validate_user(user: &mut NewUser) -> Result<(), AppError> {
    if user.email.is_empty() || !user.email.contains('@') {
        warn!("Rejected user: invalid email");
        return Err(AppError::Validation(
            "email must not be empty and must contain '@'".to_string(),
        ));
    }
    if user.login.is_empty() || user.login.contains(' ') {
        warn!("Rejected user: invalid login");
        return Err(AppError::Validation(
            "login must not be empty or contain spaces".to_string(),
        ));
    }
    if user.name.is_empty() {
        info!(login = %user.login, "No display name supplied, using login");
        user.name = user.login.clone();
    }
    if user.birthday > Utc::now().date_naive() {
        warn!(login = %user.login, birthday = %user.birthday, "Rejected user: birthday in the future");
        return Err(AppError::Validation(
            "birthday must not be in the future".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_film() -> NewFilm {
        NewFilm {
            name: "The General".to_string(),
            description: "A locomotive chase".to_string(),
            release_date: NaiveDate::from_ymd_opt(1926, 12, 31).unwrap(),
            duration: 67,
            rate: None,
            mpa_id: None,
            genre_ids: vec![],
        }
    }

    fn base_user() -> NewUser {
        NewUser {
            email: "buster@example.com".to_string(),
            login: "buster".to_string(),
            name: "Buster".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        }
    }

    #[test]
    fn accepts_valid_film() {
        assert!(validate_film(&base_film()).is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let mut film = base_film();
        film.name = String::new();
        assert!(matches!(
            validate_film(&film),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_description_over_limit() {
        let mut film = base_film();
        film.description = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert!(matches!(
            validate_film(&film),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn accepts_description_at_limit() {
        let mut film = base_film();
        film.description = "x".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(validate_film(&film).is_ok());
    }

    #[test]
    fn rejects_pre_cinema_release_date() {
        let mut film = base_film();
        film.release_date = NaiveDate::from_ymd_opt(1895, 12, 27).unwrap();
        assert!(matches!(
            validate_film(&film),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn accepts_earliest_release_date() {
        let mut film = base_film();
        film.release_date = earliest_release_date();
        assert!(validate_film(&film).is_ok());
    }

    #[test]
    fn rejects_non_positive_duration() {
        let mut film = base_film();
        film.duration = 0;
        assert!(matches!(
            validate_film(&film),
            Err(AppError::Validation(_))
        ));
        film.duration = -10;
        assert!(matches!(
            validate_film(&film),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_email_without_at_sign() {
        let mut user = base_user();
        user.email = "busterexample.com".to_string();
        assert!(matches!(
            validate_user(&mut user),
            Err(AppError::Validation(_))
        ));
        user.email = String::new();
        assert!(matches!(
            validate_user(&mut user),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_login_with_space() {
        let mut user = base_user();
        user.login = "bus ter".to_string();
        assert!(matches!(
            validate_user(&mut user),
            Err(AppError::Validation(_))
        ));
        user.login = String::new();
        assert!(matches!(
            validate_user(&mut user),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn empty_name_falls_back_to_login() {
        let mut user = base_user();
        user.name = String::new();
        validate_user(&mut user).unwrap();
        assert_eq!(user.name, "buster");
    }

    #[test]
    fn rejects_future_birthday() {
        let mut user = base_user();
        user.birthday = Utc::now().date_naive() + chrono::Days::new(1);
        assert!(matches!(
            validate_user(&mut user),
            Err(AppError::Validation(_))
        ));
    }
}
