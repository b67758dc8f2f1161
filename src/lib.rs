//! Authdash: a Leptos single-page frontend for email/password, Google and
//! Line sign-in against a hosted Supabase auth backend, plus a small
//! protected dashboard.
//!
//! Session state, route guarding, callback handling and form validation are
//! plain Rust and compile on every target. Everything that touches the
//! browser (HTTP, `localStorage`, components, routes) is gated to `wasm32`.

#[path = "lib/mod.rs"]
pub mod app_lib;
pub mod features;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod routes;

#[cfg(target_arch = "wasm32")]
pub use app::start;
