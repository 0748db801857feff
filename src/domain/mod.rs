//! Domain entities and validation
//!
//! Models for films, users, and the reference data they point at, plus the
//! pure field-validation functions that run before any persistence mutation.

pub mod models;
pub mod validate;
