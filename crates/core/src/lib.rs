//! Pure domain logic for the cragmap backend.
//!
//! Nothing in this crate performs I/O: grade tables, validation rules, the
//! submission wizard, leaderboard arithmetic, logbook statistics and payment
//! webhook verification are all plain functions over plain data so the API
//! and repository layers can share them.

pub mod crags;
pub mod error;
pub mod geo;
pub mod grades;
pub mod leaderboard;
pub mod moderation;
pub mod payments;
pub mod roles;
pub mod settings;
pub mod stats;
pub mod submission;
pub mod types;
pub mod username;
