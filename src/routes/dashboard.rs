use crate::components::AppShell;
use crate::components::layout::Avatar;
use crate::features::auth::display::{
    NOT_AVAILABLE, UserDisplayInfo, format_date, format_date_time, provider_badge_class,
    provider_label, short_id,
};
use crate::features::auth::state::use_auth;
use chrono::Local;
use leptos::prelude::*;

#[component]
fn DetailRow(#[prop(into)] label: String, #[prop(into)] value: String) -> impl IntoView {
    view! {
        <div class="px-4 py-4 sm:grid sm:grid-cols-3 sm:gap-4 sm:px-6">
            <dt class="text-sm font-medium text-gray-500">{label}</dt>
            <dd class="mt-1 break-all text-sm text-gray-900 sm:col-span-2 sm:mt-0">{value}</dd>
        </div>
    }
}

#[component]
fn VerifiedBadge(verified: bool) -> impl IntoView {
    let (label, tone) = if verified {
        ("✓ 已驗證", "bg-green-100 text-green-800")
    } else {
        ("待驗證", "bg-yellow-100 text-yellow-800")
    };
    view! {
        <span class=format!(
            "inline-flex items-center rounded-full px-3 py-1 text-xs font-medium {tone}",
        )>{label}</span>
    }
}

/// Signed-in landing page: who the user is and how they signed in.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let user = Memo::new(move |_| auth.state.with(|state| state.user.clone()));

    let content = move || {
        user.get().map(|user| {
            let info = UserDisplayInfo::from_user(&user);
            let provider = info.provider.clone();
            let provider_name = provider_label(&provider).to_string();
            let badge_class = format!(
                "inline-flex items-center rounded-full px-3 py-1 text-xs font-medium {}",
                provider_badge_class(&provider)
            );
            let verified = info.email_verified;
            let email = info
                .email
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let created = user
                .created_at
                .map(|value| format_date(&value.with_timezone(&Local)))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let last_sign_in = user
                .last_sign_in_at
                .map(|value| format_date_time(&value.with_timezone(&Local)))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let name = info.name.clone();

            view! {
                <section class="mb-8 rounded-2xl bg-gradient-to-r from-blue-600 to-indigo-600 p-6 text-white shadow-lg sm:p-8">
                    <div class="flex flex-col items-center gap-4 sm:flex-row sm:items-center">
                        <Avatar info=info large=true />
                        <div class="text-center sm:text-left">
                            <h2 class="mb-1 text-2xl font-bold sm:text-3xl">
                                {format!("歡迎回來，{name}！")}
                            </h2>
                            <p class="mb-3 text-blue-100">"很高興再次見到您。這是您的個人儀表板。"</p>
                            <div class="flex flex-wrap justify-center gap-2 sm:justify-start">
                                <span class=badge_class.clone()>
                                    {format!("透過 {provider_name} 登入")}
                                </span>
                                <VerifiedBadge verified=verified />
                            </div>
                        </div>
                    </div>
                </section>
                <section class="mb-8 overflow-hidden rounded-2xl bg-white shadow">
                    <div class="border-b border-gray-100 px-4 py-5 sm:px-6">
                        <h3 class="text-lg font-medium text-gray-900">"帳戶資訊"</h3>
                        <p class="text-sm text-gray-500">"您的個人帳戶詳細資訊"</p>
                    </div>
                    <dl class="divide-y divide-gray-100">
                        <DetailRow label="電子郵件" value=email />
                        <DetailRow label="用戶 ID" value=short_id(&user.id) />
                        <DetailRow label="註冊時間" value=created />
                        <DetailRow label="最後登入" value=last_sign_in />
                    </dl>
                </section>
                <dl class="grid grid-cols-1 gap-4 sm:grid-cols-2">
                    <div class="rounded-2xl bg-white p-6 shadow">
                        <dt class="text-sm font-medium text-gray-500">"登入方式"</dt>
                        <dd class="mt-2">
                            <span class=badge_class>{provider_name.clone()}</span>
                        </dd>
                    </div>
                    <div class="rounded-2xl bg-white p-6 shadow">
                        <dt class="text-sm font-medium text-gray-500">"驗證狀態"</dt>
                        <dd class="mt-2"><VerifiedBadge verified=verified /></dd>
                    </div>
                </dl>
            }
        })
    };

    view! { <AppShell>{content}</AppShell> }
}
