//! Moderation access: the one role check this service makes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cragmap_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller whose token grants `app_metadata.role = "admin"`.
///
/// Missing or invalid tokens are rejected with 401 by [`AuthUser`]; a valid
/// token without the admin grant gets 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(
                user_id = %user.user_id,
                path = %parts.uri.path(),
                "Non-admin attempted a moderation action",
            );
            return Err(CoreError::Forbidden("Admin role required".into()).into());
        }
        Ok(RequireAdmin(user))
    }
}
