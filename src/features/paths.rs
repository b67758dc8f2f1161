//! Client-side route paths.

pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const AUTH_CALLBACK: &str = "/auth/callback";
pub const DASHBOARD: &str = "/dashboard";
