//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod climb_repo;
pub mod crag_report_repo;
pub mod crag_repo;
pub mod image_repo;
pub mod leaderboard_repo;
pub mod log_repo;
pub mod profile_repo;
pub mod region_repo;

pub use climb_repo::ClimbRepo;
pub use crag_report_repo::CragReportRepo;
pub use crag_repo::CragRepo;
pub use image_repo::ImageRepo;
pub use leaderboard_repo::LeaderboardRepo;
pub use log_repo::LogRepo;
pub use profile_repo::ProfileRepo;
pub use region_repo::RegionRepo;
