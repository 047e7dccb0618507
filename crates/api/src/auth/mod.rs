//! Authentication primitives.
//!
//! - [`jwt`] -- validation of access tokens issued by the external auth provider.

pub mod jwt;
