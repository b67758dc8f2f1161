//! Alert banners for errors and notices. Messages must be safe to render
//! and should never include secrets or tokens.

use leptos::prelude::*;

#[derive(Clone, Copy)]
/// Supported alert styles.
pub enum AlertKind {
    Error,
    Success,
}

/// Renders a styled alert banner. With `on_dismiss` the banner gets a close
/// button that invokes it.
#[component]
pub fn Alert(
    kind: AlertKind,
    #[prop(optional, into)] title: Option<String>,
    message: String,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    let class = match kind {
        AlertKind::Error => {
            "flex items-start gap-3 rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700"
        }
        AlertKind::Success => {
            "flex items-start gap-3 rounded-lg border border-emerald-200 bg-emerald-50 px-4 py-3 text-sm text-emerald-700"
        }
    };

    view! {
        <div class=class role="alert">
            <div class="flex-1">
                {title.map(|title| view! { <p class="font-medium">{title}</p> })}
                <p>{message}</p>
            </div>
            {on_dismiss
                .map(|on_dismiss| {
                    view! {
                        <button
                            type="button"
                            class="shrink-0 opacity-70 hover:opacity-100"
                            aria-label="關閉"
                            on:click=move |_| on_dismiss.run(())
                        >
                            "×"
                        </button>
                    }
                })}
        </div>
    }
}
