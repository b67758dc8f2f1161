//! Auth context for the frontend. The provider builds the session store once
//! on mount, mirrors its state into a signal and tears it down on unmount.
//! Screens read the signal and call the store through this context; nothing
//! here holds a password longer than one call.

use super::browser;
use super::client::GoTrueClient;
use super::store::{AuthState, SessionStore, restoration_settled};
use super::types::{OAuthRedirect, ProviderError, Session, SignUpOutcome};
use crate::app_lib::config::AppConfig;
use leptos::{prelude::*, task::spawn_local};
use secrecy::SecretString;
use std::rc::Rc;

type Store = Rc<SessionStore<GoTrueClient>>;

#[derive(Clone, Copy)]
/// Auth state and store handle shared through Leptos.
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    /// True until the first restoration attempt settles. Guards wait on
    /// this rather than `loading`, which also covers in-flight password
    /// operations that must not unmount the form.
    pub restoring: Signal<bool>,
    pub is_authenticated: Signal<bool>,
    pub loading: Signal<bool>,
    pub error: Signal<Option<String>>,
    restored: RwSignal<bool>,
    store: StoredValue<Store, LocalStorage>,
}

impl AuthContext {
    fn new(store: Store) -> Self {
        let state = RwSignal::new(store.state());
        let restored = RwSignal::new(false);
        Self {
            state,
            restored,
            restoring: Signal::derive(move || !restored.get()),
            is_authenticated: Signal::derive(move || state.with(AuthState::is_authenticated)),
            loading: Signal::derive(move || state.with(|state| state.loading)),
            error: Signal::derive(move || state.with(|state| state.error.clone())),
            store: StoredValue::new_local(store),
        }
    }

    fn store(&self) -> Store {
        self.store.get_value()
    }

    /// Mirrors a store snapshot into the signals.
    fn publish(&self, snapshot: &AuthState) {
        let already = self.restored.get_untracked();
        if restoration_settled(already, snapshot) && !already {
            self.restored.set(true);
        }
        self.state.set(snapshot.clone());
    }

    pub async fn sign_in_with_email(
        &self,
        email: String,
        password: SecretString,
    ) -> Result<Session, ProviderError> {
        self.store().sign_in_with_email(&email, &password).await
    }

    pub async fn sign_up_with_email(
        &self,
        email: String,
        password: SecretString,
    ) -> Result<SignUpOutcome, ProviderError> {
        self.store().sign_up_with_email(&email, &password).await
    }

    pub async fn sign_in_with_google(&self) -> Result<OAuthRedirect, ProviderError> {
        self.store().sign_in_with_google().await
    }

    pub async fn sign_in_with_line(&self) -> Result<OAuthRedirect, ProviderError> {
        self.store().sign_in_with_line().await
    }

    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        self.store().sign_out().await
    }

    pub fn clear_error(&self) {
        self.store().clear_error();
    }
}

/// Creates the session store, starts restoration and event listening, and
/// provides the auth context to `children`.
#[component]
pub fn AuthProvider(config: AppConfig, children: Children) -> impl IntoView {
    let store: Store = Rc::new(SessionStore::new(
        GoTrueClient::new(&config),
        browser::origin(),
    ));
    let auth = AuthContext::new(Rc::clone(&store));
    provide_context(auth);

    store.observe(move |snapshot| auth.publish(snapshot));

    let running = Rc::clone(&store);
    spawn_local(async move {
        running.run().await;
    });

    on_cleanup(move || {
        if let Some(store) = auth.store.try_get_value() {
            store.shutdown();
        }
    });

    view! { {children()} }
}

/// Returns the auth context provided by `AuthProvider`.
///
/// # Panics
///
/// Panics when called outside `AuthProvider`; every route is mounted inside
/// it, so this is a wiring bug rather than a runtime condition.
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
