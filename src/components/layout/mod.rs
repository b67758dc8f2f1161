//! Layout components shared across routes.

mod app_shell;
mod auth_card;

pub(crate) use app_shell::{AppShell, Avatar};
pub(crate) use auth_card::AuthCard;
