//! Well-known role name constants.
//!
//! The auth service stores the application role in the token's
//! `app_metadata.role` claim; the top-level `role` claim is always
//! `"authenticated"` for signed-in users.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AUTHENTICATED: &str = "authenticated";
