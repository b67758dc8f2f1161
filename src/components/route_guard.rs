//! Router-side half of the route guards. The decision itself comes from
//! `features::auth::guards`; these components apply it by navigating or by
//! rendering the protected children. Guards are UX only; the auth service
//! enforces real access control.

use crate::components::LoadingScreen;
use crate::features::auth::guards::{
    GuardDecision, RETURN_TO_PARAM, require_no_session, require_session, return_path,
};
use crate::features::auth::state::use_auth;
use leptos::prelude::*;
use leptos_router::{
    NavigateOptions,
    hooks::{use_location, use_navigate, use_query_map},
};

fn replace() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..Default::default()
    }
}

/// Renders `children` only for signed-in users. Signed-out users are sent
/// to the login screen with the requested path preserved.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let location = use_location();

    let decision = Memo::new(move |_| {
        let requested = format!("{}{}", location.pathname.get(), location.search.get());
        require_session(auth.restoring.get(), auth.is_authenticated.get(), &requested)
    });

    Effect::new(move |_| {
        if let GuardDecision::Redirect(redirect) = decision.get() {
            navigate(&redirect.href(), replace());
        }
    });

    view! {
        {move || match decision.get() {
            GuardDecision::Render => children().into_any(),
            GuardDecision::Pending | GuardDecision::Redirect(_) => {
                view! { <LoadingScreen /> }.into_any()
            }
        }}
    }
}

/// Renders `children` only for signed-out users. A signed-in user goes to
/// the preserved return path, or the dashboard when there is none.
#[component]
pub fn RequireGuest(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_query_map();

    let decision =
        Memo::new(move |_| require_no_session(auth.restoring.get(), auth.is_authenticated.get()));

    Effect::new(move |_| {
        if let GuardDecision::Redirect(_) = decision.get() {
            let target = query.with_untracked(|query| return_path(query.get_str(RETURN_TO_PARAM)));
            navigate(&target, replace());
        }
    });

    view! {
        {move || match decision.get() {
            GuardDecision::Render => children().into_any(),
            GuardDecision::Pending | GuardDecision::Redirect(_) => {
                view! { <LoadingScreen /> }.into_any()
            }
        }}
    }
}
