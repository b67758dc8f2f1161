use leptos::prelude::*;

/// Static screen mounted instead of the app when configuration is unusable.
#[component]
pub fn ConfigErrorPage(message: String) -> impl IntoView {
    view! {
        <div class="flex min-h-screen items-center justify-center bg-gray-50 px-4">
            <div class="w-full max-w-md rounded-2xl border border-red-200 bg-white p-8 text-center shadow">
                <h1 class="mb-2 text-xl font-bold text-gray-900">"設定錯誤"</h1>
                <p class="mb-4 text-sm text-gray-600">
                    "應用程式缺少必要的認證服務設定，無法啟動。"
                </p>
                <pre class="overflow-x-auto rounded-lg bg-red-50 p-3 text-left text-xs text-red-700">
                    {message}
                </pre>
            </div>
        </div>
    }
}
