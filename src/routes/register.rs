use crate::components::{Alert, AlertKind, AuthCard, Button, PasswordInput, Spinner};
use crate::features::auth::password::{PasswordStrength, evaluate};
use crate::features::auth::state::use_auth;
use crate::features::auth::validation::{normalize_email, passwords_match, registration_ready};
use crate::features::paths;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::{
    NavigateOptions,
    components::A,
    hooks::use_navigate,
};
use secrecy::SecretString;

#[component]
fn StrengthMeter(strength: Memo<PasswordStrength>) -> impl IntoView {
    view! {
        <div class="mt-3 space-y-2">
            <div class="flex items-center justify-between">
                <span class="text-xs text-gray-500">"密碼強度"</span>
                <span class=move || {
                    format!("text-xs font-medium {}", strength.with(|s| s.tier.text_class()))
                }>{move || strength.with(|s| s.tier.label())}</span>
            </div>
            <div class="h-2 w-full rounded-full bg-gray-200">
                <div
                    class=move || {
                        format!(
                            "h-2 rounded-full transition-all duration-300 {}",
                            strength.with(|s| s.tier.bar_class()),
                        )
                    }
                    style=move || format!("width: {}%", strength.with(PasswordStrength::percent))
                ></div>
            </div>
            <ul class="space-y-1 text-xs text-gray-500">
                {move || {
                    strength
                        .with(|s| s.feedback.clone())
                        .into_iter()
                        .map(|item| {
                            view! {
                                <li class="flex items-center gap-1">
                                    <span class="text-red-400">"✕"</span>
                                    <span>{item}</span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (awaiting_confirmation, set_awaiting_confirmation) = signal::<Option<String>>(None);

    let strength = Memo::new(move |_| password.with(|password| evaluate(password)));
    let matches = Signal::derive(move || passwords_match(&password.get(), &confirm.get()));
    let form_valid = Signal::derive(move || {
        strength.with(|strength| {
            registration_ready(&email.get(), &password.get(), &confirm.get(), strength)
        })
    });

    let register_action = Action::new_local(move |_: &()| {
        let email_value = normalize_email(&email.get_untracked());
        let password_value = SecretString::from(password.get_untracked());
        async move { auth.sign_up_with_email(email_value, password_value).await }
    });
    let submitting = register_action.pending();
    let submit_disabled = Signal::derive(move || !form_valid.get() || submitting.get());

    Effect::new(move |_| {
        if let Some(Ok(outcome)) = register_action.value().get() {
            if outcome.session.is_some() {
                navigate(
                    paths::DASHBOARD,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                );
            } else {
                set_awaiting_confirmation.set(Some(
                    outcome.user.email.unwrap_or_else(|| email.get_untracked()),
                ));
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if submit_disabled.get_untracked() {
            return;
        }
        register_action.dispatch(());
    };

    view! {
        <AuthCard title="建立新帳戶" subtitle="加入我們，開始您的旅程">
            {move || {
                auth.error
                    .get()
                    .map(|message| {
                        view! {
                            <Alert
                                kind=AlertKind::Error
                                title="註冊失敗"
                                message=message
                                on_dismiss=Callback::new(move |()| auth.clear_error())
                            />
                        }
                    })
            }}
            {move || {
                awaiting_confirmation
                    .get()
                    .map(|address| {
                        view! {
                            <Alert
                                kind=AlertKind::Success
                                title="請查收確認信"
                                message=format!("我們已寄送確認連結至 {address}，完成驗證後即可登入。")
                            />
                        }
                    })
            }}
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
                <div>
                    <PasswordInput
                        id="password"
                        label="密碼"
                        placeholder="建立安全密碼"
                        autocomplete="new-password"
                        value=password
                        set_value=set_password
                    />
                    <Show when=move || password.with(|password| !password.is_empty())>
                        <StrengthMeter strength=strength />
                    </Show>
                </div>
                <div>
                    <PasswordInput
                        id="confirm-password"
                        label="確認密碼"
                        placeholder="再次輸入密碼"
                        autocomplete="new-password"
                        value=confirm
                        set_value=set_confirm
                    />
                    <Show when=move || confirm.with(|confirm| !confirm.is_empty())>
                        <div class="mt-2 text-xs">
                            {move || {
                                if matches.get() {
                                    view! { <span class="text-green-600">"✓ 密碼匹配"</span> }
                                        .into_any()
                                } else {
                                    view! { <span class="text-red-600">"✕ 密碼不匹配"</span> }
                                        .into_any()
                                }
                            }}
                        </div>
                    </Show>
                </div>
                <Button button_type="submit" disabled=submit_disabled>
                    {move || {
                        if submitting.get() {
                            view! {
                                <Spinner />
                                <span>"建立帳戶中..."</span>
                            }
                                .into_any()
                        } else {
                            view! { <span>"建立帳戶"</span> }.into_any()
                        }
                    }}
                </Button>
            </form>
            <p class="text-center text-sm text-gray-600">
                "已經有帳戶了？ "
                <A href=paths::LOGIN {..} class="font-medium text-blue-600 hover:text-blue-500">
                    "立即登入"
                </A>
            </p>
        </AuthCard>
    }
}
