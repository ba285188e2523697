//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the only writer of authentication state; `auth` is the
//! read model it publishes. `storage` isolates token persistence and
//! `notice` holds transient UI feedback.

pub mod auth;
pub mod notice;
pub mod session;
pub mod storage;
