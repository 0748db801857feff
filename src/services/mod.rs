//! Service layer
//!
//! Orchestrates validation, persistence, and reference-data enrichment on
//! top of the repository traits.

pub mod films;
pub mod genres;
pub mod mpa;
pub mod users;

pub use films::FilmService;
pub use genres::GenreService;
pub use mpa::MpaService;
pub use users::UserService;
