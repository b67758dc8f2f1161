use leptos::prelude::*;

/// Password field with a show/hide toggle. The value lives in the caller's
/// signal; it is never echoed anywhere else.
#[component]
pub fn PasswordInput(
    id: &'static str,
    #[prop(into)] label: String,
    #[prop(into)] placeholder: String,
    autocomplete: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    let (visible, set_visible) = signal(false);

    view! {
        <div>
            <label class="mb-2 block text-sm font-medium text-gray-700" for=id>
                {label}
            </label>
            <div class="relative">
                <input
                    id=id
                    type=move || if visible.get() { "text" } else { "password" }
                    class="block w-full rounded-xl border border-gray-200 bg-gray-50 p-3 pr-16 text-sm text-gray-900 focus:border-blue-500 focus:ring-blue-500"
                    autocomplete=autocomplete
                    placeholder=placeholder
                    required
                    prop:value=move || value.get()
                    on:input=move |event| set_value.set(event_target_value(&event))
                />
                <button
                    type="button"
                    class="absolute inset-y-0 right-0 px-3 text-xs font-medium text-gray-500 hover:text-gray-700"
                    aria-label=move || if visible.get() { "隱藏密碼" } else { "顯示密碼" }
                    on:click=move |_| set_visible.update(|visible| *visible = !*visible)
                >
                    {move || if visible.get() { "隱藏" } else { "顯示" }}
                </button>
            </div>
        </div>
    }
}
