use leptos::prelude::*;

/// Centered card used by the login and registration screens.
#[component]
pub fn AuthCard(
    #[prop(into)] title: String,
    #[prop(into)] subtitle: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="relative flex min-h-screen items-center justify-center overflow-hidden bg-gradient-to-br from-blue-50 via-white to-indigo-100 px-4 py-8">
            <div class="pointer-events-none absolute -top-24 -right-24 h-72 w-72 rounded-full bg-blue-200 opacity-40 blur-3xl"></div>
            <div class="pointer-events-none absolute -bottom-24 -left-24 h-72 w-72 rounded-full bg-indigo-200 opacity-40 blur-3xl"></div>
            <div class="relative w-full max-w-md">
                <div class="mb-6 text-center">
                    <div class="mx-auto mb-4 flex h-14 w-14 items-center justify-center rounded-2xl bg-gradient-to-br from-blue-600 to-indigo-600 text-2xl font-bold text-white shadow-lg">
                        "A"
                    </div>
                    <h2 class="mb-2 text-2xl font-bold text-gray-900 sm:text-3xl">{title}</h2>
                    <p class="text-sm text-gray-600 sm:text-base">{subtitle}</p>
                </div>
                <div class="space-y-6 rounded-2xl border border-gray-100 bg-white/90 p-6 shadow-xl backdrop-blur sm:p-8">
                    {children()}
                </div>
            </div>
        </div>
    }
}
