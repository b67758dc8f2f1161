//! Signed-in layout with the dashboard header. It owns the sign-out button
//! and the mobile menu toggle so the dashboard can focus on content.
//! Navigation remains client-side; the auth service enforces access.

use crate::app_lib::GIT_COMMIT_HASH;
use crate::components::Alert;
use crate::components::AlertKind;
use crate::features::auth::{display::UserDisplayInfo, state::use_auth};
use leptos::prelude::*;

/// Profile picture, or the first letter of the name when there is none.
#[component]
pub fn Avatar(info: UserDisplayInfo, #[prop(optional)] large: bool) -> impl IntoView {
    let size = if large {
        "h-16 w-16 text-2xl sm:h-20 sm:w-20"
    } else {
        "h-8 w-8 text-sm"
    };
    match info.avatar.clone() {
        Some(src) => view! {
            <img
                src=src
                alt="用戶頭像"
                class=format!("{size} rounded-full border-2 border-white object-cover shadow")
            />
        }
        .into_any(),
        None => view! {
            <div class=format!(
                "{size} flex items-center justify-center rounded-full bg-gradient-to-br from-blue-500 to-indigo-600 font-semibold text-white shadow",
            )>{info.initial()}</div>
        }
        .into_any(),
    }
}

/// Wraps signed-in routes with the header and main content container.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let (menu_open, set_menu_open) = signal(false);
    let info = Memo::new(move |_| {
        auth.state
            .with(|state| state.user.as_ref().map(UserDisplayInfo::from_user))
    });

    // `RequireAuth` sends the visitor to the login screen once the
    // `SignedOut` event lands.
    let sign_out_action = Action::new_local(move |_: &()| async move { auth.sign_out().await });
    let signing_out = sign_out_action.pending();

    let sign_out = move |_| {
        set_menu_open.set(false);
        sign_out_action.dispatch(());
    };
    let sign_out_label = move || if signing_out.get() { "登出中..." } else { "登出" };

    view! {
        <div class="flex min-h-screen flex-col bg-gray-50">
            <header class="sticky top-0 z-10 border-b border-gray-200 bg-white/90 backdrop-blur">
                <div class="mx-auto flex h-16 max-w-7xl items-center justify-between px-4 sm:px-6 lg:px-8">
                    <div class="flex items-center gap-3">
                        <div class="flex h-8 w-8 items-center justify-center rounded-lg bg-gradient-to-br from-blue-600 to-indigo-600 font-bold text-white">
                            "A"
                        </div>
                        <h1 class="text-lg font-semibold text-gray-900 sm:text-xl">"儀表板"</h1>
                    </div>
                    <div class="hidden items-center gap-4 sm:flex">
                        {move || {
                            info.get()
                                .map(|info| {
                                    let name = info.name.clone();
                                    view! {
                                        <div class="flex items-center gap-2">
                                            <Avatar info=info />
                                            <span class="text-sm font-medium text-gray-700">{name}</span>
                                        </div>
                                    }
                                })
                        }}
                        <button
                            type="button"
                            class="rounded-lg border border-gray-200 px-3 py-1.5 text-sm font-medium text-gray-700 hover:bg-gray-100 disabled:opacity-60"
                            disabled=move || signing_out.get()
                            on:click=sign_out
                        >
                            {sign_out_label}
                        </button>
                    </div>
                    <button
                        type="button"
                        class="inline-flex h-10 w-10 items-center justify-center rounded-lg text-gray-500 hover:bg-gray-100 focus:outline-none focus:ring-2 focus:ring-gray-200 sm:hidden"
                        aria-controls="mobile-menu"
                        aria-expanded=move || menu_open.get().to_string()
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        <span class="sr-only">"Open main menu"</span>
                        <svg
                            class="h-5 w-5"
                            aria-hidden="true"
                            xmlns="http://www.w3.org/2000/svg"
                            fill="none"
                            viewBox="0 0 17 14"
                        >
                            <path
                                stroke="currentColor"
                                stroke-linecap="round"
                                stroke-linejoin="round"
                                stroke-width="2"
                                d="M1 1h15M1 7h15M1 13h15"
                            ></path>
                        </svg>
                    </button>
                </div>
                <div
                    id="mobile-menu"
                    class="border-t border-gray-100 px-4 py-3 sm:hidden"
                    class:hidden=move || !menu_open.get()
                >
                    {move || {
                        info.get()
                            .map(|info| {
                                let name = info.name.clone();
                                let email = info.email.clone().unwrap_or_default();
                                view! {
                                    <div class="mb-3 flex items-center gap-3">
                                        <Avatar info=info />
                                        <div>
                                            <p class="text-sm font-medium text-gray-900">{name}</p>
                                            <p class="text-xs text-gray-500">{email}</p>
                                        </div>
                                    </div>
                                }
                            })
                    }}
                    <button
                        type="button"
                        class="w-full rounded-lg border border-gray-200 px-3 py-2 text-sm font-medium text-gray-700 hover:bg-gray-100 disabled:opacity-60"
                        disabled=move || signing_out.get()
                        on:click=sign_out
                    >
                        {sign_out_label}
                    </button>
                </div>
            </header>
            <main class="mx-auto w-full max-w-7xl flex-1 px-4 py-6 sm:px-6 sm:py-8 lg:px-8">
                {move || {
                    auth.error
                        .get()
                        .map(|message| {
                            view! {
                                <div class="mb-6">
                                    <Alert
                                        kind=AlertKind::Error
                                        message=message
                                        on_dismiss=Callback::new(move |()| auth.clear_error())
                                    />
                                </div>
                            }
                        })
                }}
                {children()}
            </main>
            <footer class="py-4 text-center text-xs text-gray-400">
                {format!("build {}", &GIT_COMMIT_HASH[..GIT_COMMIT_HASH.len().min(7)])}
            </footer>
        </div>
    }
}
