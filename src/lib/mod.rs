//! Shared frontend utilities for configuration, errors, logging, HTTP access
//! and build metadata.
//!
//! ## Auth endpoints
//!
//! All identity calls go to the Supabase auth service mounted at
//! `{supabase_url}/auth/v1`. Every request carries the public anon key in the
//! `apikey` header; session-bound calls add `Authorization: Bearer`.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. Callers must never log the
//! bearer token or credential payloads passed through here.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub(crate) mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub mod config;
pub mod errors;
pub mod telemetry;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub use errors::AppError;
