//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards wrap routed pages; the notice banner is mounted once in the shell.

pub mod notice_banner;
pub mod route_guard;
