use crate::components::LoadingScreen;
use crate::features::auth::callback::{CallbackOutcome, CallbackParams, resolve};
use crate::features::auth::state::use_auth;
use leptos::prelude::*;
use leptos_router::{
    NavigateOptions,
    hooks::{use_location, use_navigate},
};
use tracing::warn;

/// Landing page for provider redirects. The identity client has already
/// exchanged any authorization code during restoration; this page only
/// forwards the user once the outcome is known.
#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let location = use_location();

    Effect::new(move |_| {
        let params = CallbackParams::from_query(&location.search.get());
        if let Some(error) = &params.error {
            warn!(%error, "OAuth provider returned an error");
        }
        if let CallbackOutcome::Redirect(target) = resolve(&params, auth.is_authenticated.get()) {
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    view! { <LoadingScreen message="正在處理登入..." /> }
}
