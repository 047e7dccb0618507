//! Request handlers, one module per resource.
//!
//! Handlers validate input with `cragmap_core`, delegate persistence to the
//! repositories in `cragmap_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod climbs;
pub mod crags;
pub mod images;
pub mod leaderboard;
pub mod locations;
pub mod logs;
pub mod profile;
pub mod regions;
pub mod settings;
pub mod stripe;
pub mod submissions;
