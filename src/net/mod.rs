//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues requests, `error` classifies failures, and `types` defines
//! the wire schema.

pub mod api;
pub mod error;
pub mod types;
