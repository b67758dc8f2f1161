//! Shared UI components exported for routes and features.

pub(crate) mod layout;
mod route_guard;
pub(crate) mod ui;

pub(crate) use layout::{AppShell, AuthCard};
pub(crate) use route_guard::{RequireAuth, RequireGuest};
pub(crate) use ui::{Alert, AlertKind, Button, LoadingScreen, PasswordInput, Spinner};
