//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for inserts and patches where the API accepts them

pub mod climb;
pub mod crag;
pub mod crag_report;
pub mod image;
pub mod leaderboard;
pub mod log;
pub mod profile;
pub mod region;
pub mod route_line;
