use crate::components::{Alert, AlertKind, AuthCard, Button, PasswordInput, Spinner};
use crate::features::auth::callback::ERROR_PARAM;
use crate::features::auth::guards::{RETURN_TO_PARAM, return_path};
use crate::features::auth::state::use_auth;
use crate::features::auth::validation::{login_ready, normalize_email};
use crate::features::paths;
use leptos::ev::SubmitEvent;
use leptos::{prelude::*, task::spawn_local};
use leptos_router::{
    NavigateOptions,
    components::A,
    hooks::{use_navigate, use_query_map},
};
use secrecy::SecretString;

const OAUTH_BUTTON_CLASS: &str = "flex w-full items-center justify-center gap-3 rounded-xl border border-gray-200 bg-white px-4 py-3 text-sm font-medium text-gray-700 shadow-sm hover:bg-gray-50 hover:shadow-md disabled:cursor-not-allowed disabled:opacity-50 sm:text-base";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let query = use_query_map();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (google_pending, set_google_pending) = signal(false);
    let (line_pending, set_line_pending) = signal(false);
    let (redirect_error_dismissed, set_redirect_error_dismissed) = signal(false);

    // An OAuth failure comes back as `?error=`; the store error wins when
    // both are present.
    let redirect_error = Memo::new(move |_| {
        query
            .with(|query| query.get(ERROR_PARAM))
            .filter(|message| !message.trim().is_empty())
    });
    let banner = Signal::derive(move || {
        auth.error.get().or_else(|| {
            if redirect_error_dismissed.get() {
                None
            } else {
                redirect_error.get()
            }
        })
    });
    let dismiss = Callback::new(move |()| {
        auth.clear_error();
        set_redirect_error_dismissed.set(true);
    });

    let login_action = Action::new_local(move |_: &()| {
        let email_value = normalize_email(&email.get_untracked());
        let password_value = SecretString::from(password.get_untracked());
        async move { auth.sign_in_with_email(email_value, password_value).await }
    });
    let submitting = login_action.pending();

    Effect::new(move |_| {
        if let Some(Ok(_)) = login_action.value().get() {
            let target = query.with_untracked(|query| return_path(query.get_str(RETURN_TO_PARAM)));
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if submitting.get_untracked()
            || !login_ready(&email.get_untracked(), &password.get_untracked())
        {
            return;
        }
        set_redirect_error_dismissed.set(true);
        login_action.dispatch(());
    };

    let on_google = move |_| {
        set_google_pending.set(true);
        spawn_local(async move {
            // Success leaves the page, so only a failure re-enables the button.
            if auth.sign_in_with_google().await.is_err() {
                set_google_pending.set(false);
            }
        });
    };
    let on_line = move |_| {
        set_line_pending.set(true);
        spawn_local(async move {
            if auth.sign_in_with_line().await.is_err() {
                set_line_pending.set(false);
            }
        });
    };

    view! {
        <AuthCard title="歡迎回來" subtitle="登入您的帳戶以繼續">
            {move || {
                banner
                    .get()
                    .map(|message| {
                        view! {
                            <Alert
                                kind=AlertKind::Error
                                title="登入失敗"
                                message=message
                                on_dismiss=dismiss
                            />
                        }
                    })
            }}
            <div class="space-y-3">
                <button
                    type="button"
                    class=OAUTH_BUTTON_CLASS
                    disabled=move || google_pending.get() || submitting.get()
                    on:click=on_google
                >
                    <span class="font-bold text-[#4285F4]">"G"</span>
                    {move || if google_pending.get() { "連接中..." } else { "使用 Google 登入" }}
                </button>
                <button
                    type="button"
                    class=OAUTH_BUTTON_CLASS
                    disabled=move || line_pending.get() || submitting.get()
                    on:click=on_line
                >
                    <span class="font-bold text-[#00C300]">"L"</span>
                    {move || if line_pending.get() { "連接中..." } else { "使用 Line 登入" }}
                </button>
            </div>
            <div class="relative">
                <div class="absolute inset-0 flex items-center">
                    <div class="w-full border-t border-gray-200"></div>
                </div>
                <div class="relative flex justify-center text-sm">
                    <span class="bg-white px-4 font-medium text-gray-500">"或使用電子郵件"</span>
                </div>
            </div>
            <form class="space-y-5" on:submit=on_submit>
                <div>
                    <label class="mb-2 block text-sm font-medium text-gray-700" for="email">
                        "電子郵件"
                    </label>
                    <input
                        id="email"
                        type="email"
                        class="block w-full rounded-xl border border-gray-200 bg-gray-50 p-3 text-sm text-gray-900 focus:border-blue-500 focus:ring-blue-500"
                        autocomplete="email"
                        placeholder="輸入您的電子郵件"
                        required
                        prop:value=move || email.get()
                        on:input=move |event| set_email.set(event_target_value(&event))
                    />
                </div>
                <PasswordInput
                    id="password"
                    label="密碼"
                    placeholder="輸入您的密碼"
                    autocomplete="current-password"
                    value=password
                    set_value=set_password
                />
                <Button button_type="submit" disabled=submitting>
                    {move || {
                        if submitting.get() {
                            view! {
                                <Spinner />
                                <span>"登入中..."</span>
                            }
                                .into_any()
                        } else {
                            view! { <span>"登入"</span> }.into_any()
                        }
                    }}
                </Button>
            </form>
            <p class="text-center text-sm text-gray-600">
                "還沒有帳戶？ "
                <A href=paths::REGISTER {..} class="font-medium text-blue-600 hover:text-blue-500">
                    "立即註冊"
                </A>
            </p>
        </AuthCard>
    }
}
