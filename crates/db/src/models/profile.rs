//! Profile entity model and DTOs.

use cragmap_core::settings::{GradeSystem, ThemePreference, Units};
use cragmap_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table. `id` is the auth provider's user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub default_location: Option<String>,
    pub grade_system: String,
    pub units: String,
    pub theme: String,
    pub is_public: bool,
    pub is_pro: bool,
    #[serde(skip_serializing)]
    pub stripe_customer_id: Option<String>,
    pub subscription_status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Preferences view of a profile.
#[derive(Debug, Clone, Serialize)]
pub struct UserSettings {
    pub gender: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub default_location: Option<String>,
    pub grade_system: GradeSystem,
    pub units: Units,
    pub theme: ThemePreference,
    pub is_public: bool,
}

impl From<&Profile> for UserSettings {
    fn from(p: &Profile) -> Self {
        Self {
            gender: p.gender.clone(),
            country: p.country.clone(),
            bio: p.bio.clone(),
            avatar_url: p.avatar_url.clone(),
            default_location: p.default_location.clone(),
            grade_system: GradeSystem::from_str_db(&p.grade_system),
            units: Units::from_str_db(&p.units),
            theme: ThemePreference::from_str_db(&p.theme),
            is_public: p.is_public,
        }
    }
}

/// DTO for updating identity fields. `None` leaves a field unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// DTO for updating preferences. `None` leaves a field unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettings {
    pub gender: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub default_location: Option<String>,
    pub grade_system: Option<GradeSystem>,
    pub units: Option<Units>,
    pub theme: Option<ThemePreference>,
    pub is_public: Option<bool>,
}
