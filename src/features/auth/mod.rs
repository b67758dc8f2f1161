//! Auth feature covering email/password and OAuth sign-in, session
//! restoration and route protection. This module touches security
//! boundaries and must avoid logging passwords or token material.
//!
//! Flow overview: the session store restores the session once on mount and
//! then follows the identity client's auth-change events. Password sign-in
//! and sign-up go straight to the token and signup endpoints. Google and
//! Line sign-in leave the app with a PKCE challenge and come back to the
//! dashboard with `?code=`, which the client exchanges during restoration.

pub mod callback;
pub mod display;
pub mod guards;
pub mod messages;
pub mod password;
pub mod pkce;
pub mod provider;
pub mod store;
pub mod types;
pub mod validation;
pub mod wire;

#[cfg(target_arch = "wasm32")]
pub(crate) mod browser;
#[cfg(target_arch = "wasm32")]
pub(crate) mod client;
#[cfg(target_arch = "wasm32")]
pub(crate) mod state;
