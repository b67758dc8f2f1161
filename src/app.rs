use crate::app_lib::{GIT_COMMIT_HASH, config::AppConfig, telemetry};
use crate::features::auth::state::AuthProvider;
use crate::routes::{AppRoutes, ConfigErrorPage};
use leptos::prelude::*;
use leptos_router::components::Router;
use tracing::{error, info};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    view! {
        <AuthProvider config=config>
            <Router>
                <AppRoutes />
            </Router>
        </AuthProvider>
    }
}

/// Browser entry point: installs panic and log hooks, loads configuration
/// and mounts either the app or the configuration-error screen.
pub fn start() {
    console_error_panic_hook::set_once();

    match AppConfig::load() {
        Ok(config) => {
            telemetry::init(&config.log_level);
            info!(commit = GIT_COMMIT_HASH, "starting authdash");
            mount_to_body(move || view! { <App config=config /> });
        }
        Err(err) => {
            telemetry::init("info");
            error!(%err, "invalid configuration");
            let message = err.to_string();
            mount_to_body(move || view! { <ConfigErrorPage message=message /> });
        }
    }
}
