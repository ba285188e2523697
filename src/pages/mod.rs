//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration. Access control lives in the
//! guard components wrapped around them in `app`, not in the pages.

pub mod admin;
pub mod auth_callback;
pub mod dashboard;
pub mod login;
pub mod signup;
