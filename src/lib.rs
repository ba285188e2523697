//! # paysphere-web
//!
//! Leptos + WASM frontend for the PaySphere fintech product (virtual cards,
//! crypto and P2P trading, wallets, admin console).
//!
//! The crate's core is the client-side session: `state::session` owns the
//! token/profile lifecycle, `util::auth` decides what guarded routes may
//! render, and `net::api` is the thin REST wrapper both rely on. Pages and
//! components are minimal consumers of those three.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
