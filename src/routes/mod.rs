mod auth_callback;
mod config_error;
mod dashboard;
mod login;
mod register;

pub(crate) use auth_callback::AuthCallbackPage;
pub(crate) use config_error::ConfigErrorPage;
pub(crate) use dashboard::DashboardPage;
pub(crate) use login::LoginPage;
pub(crate) use register::RegisterPage;

use crate::components::{RequireAuth, RequireGuest};
use crate::features::paths;
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <Redirect path=paths::DASHBOARD /> }>
            <Route path=path!("/") view=|| view! { <Redirect path=paths::DASHBOARD /> } />
            <Route
                path=path!("/login")
                view=|| {
                    view! {
                        <RequireGuest>
                            <LoginPage />
                        </RequireGuest>
                    }
                }
            />
            <Route
                path=path!("/register")
                view=|| {
                    view! {
                        <RequireGuest>
                            <RegisterPage />
                        </RequireGuest>
                    }
                }
            />
            <Route path=path!("/auth/callback") view=AuthCallbackPage />
            <Route
                path=path!("/dashboard")
                view=|| {
                    view! {
                        <RequireAuth>
                            <DashboardPage />
                        </RequireAuth>
                    }
                }
            />
        </Routes>
    }
}
