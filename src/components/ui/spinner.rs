use leptos::prelude::*;

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div
            class="inline-block h-7 w-7 animate-spin rounded-full border-4 border-blue-200 border-t-blue-600"
            role="status"
            aria-live="polite"
            aria-label="Loading"
        ></div>
    }
}

/// Full-screen placeholder shown while the session is restored or a
/// redirect is being decided.
#[component]
pub fn LoadingScreen(#[prop(optional, into)] message: Option<String>) -> impl IntoView {
    let message = message.unwrap_or_else(|| "載入中...".to_string());

    view! {
        <div class="flex min-h-screen flex-col items-center justify-center gap-4 bg-gray-50">
            <Spinner />
            <p class="text-gray-600">{message}</p>
        </div>
    }
}
