//! Session store: the single owner of auth state for the app.
//!
//! The store is constructed once at startup, runs the initial user fetch and
//! the auth-change subscription side by side, and is torn down with
//! `shutdown`. Provider events go through `reduce`, a pure
//! `(state, event) -> state` function. Both the fetch and the events are
//! last-write-wins assignments, so their relative order does not matter.
//!
//! No operation fails past this boundary: every provider error becomes an
//! `error` message on the state plus an `Err(ProviderError)` for the caller.

use super::messages::{Operation, credential_error_message, oauth_error_message};
use super::provider::{AuthError, IdentityProvider, Subscription};
use super::types::{
    AuthChangeEvent, OAuthProvider, OAuthRedirect, ProviderError, Session, SignUpOutcome, User,
};
use futures::StreamExt;
use futures::future::{AbortHandle, Abortable};
use secrecy::SecretString;
use std::cell::{Cell, RefCell};
use tracing::{debug, error, info, warn};

/// Snapshot of the auth state shared by every screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub session: Option<Session>,
    /// True during the initial restoration and in-flight password operations.
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// State before the session has been restored.
    #[must_use]
    pub fn restoring() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Applies a provider auth-change event. The event's session replaces the
/// current one, the user follows the session, loading always ends and a
/// signed-in user clears any stale error.
#[must_use]
pub fn reduce(state: AuthState, event: &AuthChangeEvent) -> AuthState {
    let user = event.session.as_ref().map(|session| session.user.clone());
    let error = if user.is_some() { None } else { state.error };
    AuthState {
        user,
        session: event.session.clone(),
        loading: false,
        error,
    }
}

/// Whether the first restoration has settled after observing `snapshot`.
/// Settles on the first snapshot that is not loading and never reverts, so
/// later password operations do not put the app back into restoration.
#[must_use]
pub fn restoration_settled(already: bool, snapshot: &AuthState) -> bool {
    already || !snapshot.loading
}

/// Splits a provider result into the caller's outcome and the message to show.
fn settle<T>(
    operation: Operation,
    result: Result<T, AuthError>,
    localize: impl FnOnce(&ProviderError) -> String,
) -> (Result<T, ProviderError>, Option<String>) {
    match result {
        Ok(value) => (Ok(value), None),
        Err(AuthError::Provider(err)) => {
            warn!(?operation, status = ?err.status, code = ?err.code, "provider rejected auth request");
            let message = localize(&err);
            (Err(err), Some(message))
        }
        Err(AuthError::Unexpected(reason)) => {
            error!(?operation, %reason, "auth request failed unexpectedly");
            let message = operation.generic_failure();
            (Err(ProviderError::new(message)), Some(message.to_string()))
        }
    }
}

type Observer = Box<dyn Fn(&AuthState)>;

/// Owns the auth state and the provider it mirrors.
pub struct SessionStore<P> {
    provider: P,
    origin: String,
    state: RefCell<AuthState>,
    observers: RefCell<Vec<Observer>>,
    listener: RefCell<Option<AbortHandle>>,
    closed: Cell<bool>,
}

impl<P: IdentityProvider> SessionStore<P> {
    /// Creates a store in the restoring state. `origin` is the site origin
    /// OAuth providers redirect back to.
    pub fn new(provider: P, origin: impl Into<String>) -> Self {
        Self {
            provider,
            origin: origin.into(),
            state: RefCell::new(AuthState::restoring()),
            observers: RefCell::new(Vec::new()),
            listener: RefCell::new(None),
            closed: Cell::new(false),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Registers an observer; it is called immediately with the current state
    /// and after every change. Observers must not register further observers.
    pub fn observe(&self, observer: impl Fn(&AuthState) + 'static) {
        observer(&self.state.borrow());
        self.observers.borrow_mut().push(Box::new(observer));
    }

    /// Restores the session and listens for auth changes until `shutdown`.
    /// The subscription is opened before the fetch starts.
    pub async fn run(&self) {
        if self.closed.get() {
            return;
        }
        let (handle, registration) = AbortHandle::new_pair();
        self.listener.replace(Some(handle));

        let events = self.provider.subscribe();
        let listen = Abortable::new(self.listen(events), registration);
        let ((), _aborted) = futures::join!(self.initialize(), listen);
        debug!("session store stopped");
    }

    /// Fetches the current user. Loading ends whatever the outcome.
    pub async fn initialize(&self) {
        let result = self.provider.current_user().await;
        let (outcome, message) = settle(Operation::Initialize, result, |err| err.message.clone());
        self.update(|state| {
            if let Ok(user) = outcome {
                debug!(signed_in = user.is_some(), "initial session restored");
                state.user = user;
            }
            if let Some(message) = message {
                state.error = Some(message);
            }
            state.loading = false;
        });
    }

    /// Applies provider events until the stream ends.
    pub async fn listen(&self, mut events: Subscription) {
        while let Some(event) = events.next().await {
            if self.closed.get() {
                break;
            }
            self.apply(&event);
        }
    }

    /// Feeds one auth-change event through the reducer.
    pub fn apply(&self, event: &AuthChangeEvent) {
        debug!(kind = %event.kind, has_session = event.session.is_some(), "applying auth change");
        self.update(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, event);
        });
    }

    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ProviderError> {
        self.begin_credential_operation();
        let result = self.provider.sign_in_with_password(email, password).await;
        let (outcome, message) = settle(Operation::SignIn, result, credential_error_message);
        self.finish_credential_operation(message);
        if outcome.is_ok() {
            info!("signed in with email");
        }
        outcome
    }

    pub async fn sign_up_with_email(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SignUpOutcome, ProviderError> {
        self.begin_credential_operation();
        let result = self.provider.sign_up(email, password).await;
        let (outcome, message) = settle(Operation::SignUp, result, credential_error_message);
        self.finish_credential_operation(message);
        if let Ok(signed_up) = &outcome {
            info!(confirmed = signed_up.session.is_some(), "signed up with email");
        }
        outcome
    }

    pub async fn sign_in_with_google(&self) -> Result<OAuthRedirect, ProviderError> {
        self.sign_in_with_oauth(OAuthProvider::Google).await
    }

    pub async fn sign_in_with_line(&self) -> Result<OAuthRedirect, ProviderError> {
        self.sign_in_with_oauth(OAuthProvider::Line).await
    }

    /// Starts a redirect sign-in. Loading is left alone because the page is
    /// about to navigate away.
    pub async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
    ) -> Result<OAuthRedirect, ProviderError> {
        self.clear_error();
        let request = provider.request(&self.origin);
        let result = self.provider.sign_in_with_oauth(&request).await;
        let (outcome, message) = settle(Operation::OAuth(provider), result, |err| {
            oauth_error_message(provider, err)
        });
        if let Some(message) = message {
            self.update(|state| state.error = Some(message));
        } else {
            info!(%provider, "redirecting to OAuth provider");
        }
        outcome
    }

    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        self.clear_error();
        let result = self.provider.sign_out().await;
        let (outcome, message) = settle(Operation::SignOut, result, |err| err.message.clone());
        match message {
            Some(message) => self.update(|state| state.error = Some(message)),
            None => info!("signed out"),
        }
        outcome
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    /// Stops the event listener and detaches observers. Later events and
    /// late provider responses no longer touch the state.
    pub fn shutdown(&self) {
        self.closed.set(true);
        if let Some(handle) = self.listener.borrow_mut().take() {
            handle.abort();
        }
        self.observers.borrow_mut().clear();
        debug!("session store shut down");
    }

    fn begin_credential_operation(&self) {
        self.update(|state| {
            state.error = None;
            state.loading = true;
        });
    }

    fn finish_credential_operation(&self, message: Option<String>) {
        self.update(|state| {
            if let Some(message) = message {
                state.error = Some(message);
            }
            state.loading = false;
        });
    }

    fn update(&self, mutate: impl FnOnce(&mut AuthState)) {
        if self.closed.get() {
            return;
        }
        let snapshot = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        for observer in self.observers.borrow().iter() {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthState, SessionStore, reduce, restoration_settled};
    use crate::features::auth::provider::{AuthError, AuthEventHub, IdentityProvider, Subscription};
    use crate::features::auth::types::fixtures::{session, user};
    use crate::features::auth::types::{
        AuthChangeEvent, AuthEventKind, OAuthProvider, OAuthRedirect, OAuthRequest, ProviderError,
        Session, SignUpOutcome, User,
    };
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    const ORIGIN: &str = "https://app.example.com";

    /// Scripted provider: each call pops the next queued response, or
    /// succeeds with a default when the queue is empty.
    #[derive(Default)]
    struct FakeProvider {
        hub: AuthEventHub,
        current_user: RefCell<VecDeque<Result<Option<User>, AuthError>>>,
        sign_in: RefCell<VecDeque<Result<Session, AuthError>>>,
        sign_up: RefCell<VecDeque<Result<SignUpOutcome, AuthError>>>,
        oauth: RefCell<VecDeque<Result<OAuthRedirect, AuthError>>>,
        sign_out: RefCell<VecDeque<Result<(), AuthError>>>,
        oauth_requests: RefCell<Vec<OAuthRequest>>,
    }

    #[async_trait(?Send)]
    impl IdentityProvider for FakeProvider {
        async fn sign_in_with_password(
            &self,
            email: &str,
            _password: &SecretString,
        ) -> Result<Session, AuthError> {
            let result = self
                .sign_in
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(session("u1", email)));
            if let Ok(session) = &result {
                self.hub.emit(&AuthChangeEvent::new(
                    AuthEventKind::SignedIn,
                    Some(session.clone()),
                ));
            }
            result
        }

        async fn sign_up(
            &self,
            email: &str,
            _password: &SecretString,
        ) -> Result<SignUpOutcome, AuthError> {
            self.sign_up.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(SignUpOutcome {
                    user: user("u2", email),
                    session: None,
                })
            })
        }

        async fn sign_in_with_oauth(
            &self,
            request: &OAuthRequest,
        ) -> Result<OAuthRedirect, AuthError> {
            self.oauth_requests.borrow_mut().push(request.clone());
            self.oauth.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(OAuthRedirect {
                    provider: request.provider,
                    url: format!("https://auth.example.com/authorize?provider={}", request.provider),
                })
            })
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            let result = self.sign_out.borrow_mut().pop_front().unwrap_or(Ok(()));
            if result.is_ok() {
                self.hub
                    .emit(&AuthChangeEvent::new(AuthEventKind::SignedOut, None));
            }
            result
        }

        async fn current_user(&self) -> Result<Option<User>, AuthError> {
            self.current_user
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(None))
        }

        fn subscribe(&self) -> Subscription {
            self.hub.subscribe()
        }
    }

    fn provider_error(message: &str) -> AuthError {
        AuthError::Provider(ProviderError {
            message: message.to_string(),
            status: Some(400),
            code: None,
        })
    }

    fn password() -> SecretString {
        SecretString::from("Abcdef1!".to_string())
    }

    /// Records every `loading` value observers see.
    fn loading_trace(store: &SessionStore<FakeProvider>) -> Rc<RefCell<Vec<bool>>> {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&trace);
        store.observe(move |state| sink.borrow_mut().push(state.loading));
        trace
    }

    async fn ready_store(provider: FakeProvider) -> SessionStore<FakeProvider> {
        let store = SessionStore::new(provider, ORIGIN);
        store.initialize().await;
        store
    }

    #[test]
    fn reduce_signed_in_sets_user_and_clears_error() {
        let state = AuthState {
            error: Some("old".to_string()),
            ..AuthState::restoring()
        };
        let event = AuthChangeEvent::new(
            AuthEventKind::SignedIn,
            Some(session("u1", "a@example.com")),
        );

        let next = reduce(state, &event);

        assert_eq!(next.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
        assert!(next.session.is_some());
        assert!(!next.loading);
        assert_eq!(next.error, None);
    }

    #[test]
    fn reduce_signed_out_keeps_error_and_drops_user() {
        let state = AuthState {
            user: Some(user("u1", "a@example.com")),
            session: Some(session("u1", "a@example.com")),
            loading: true,
            error: Some("登出失敗".to_string()),
        };

        let next = reduce(state, &AuthChangeEvent::new(AuthEventKind::SignedOut, None));

        assert_eq!(next.user, None);
        assert_eq!(next.session, None);
        assert!(!next.loading);
        assert_eq!(next.error.as_deref(), Some("登出失敗"));
    }

    #[test]
    fn user_follows_most_recent_event() {
        let events = [
            AuthChangeEvent::new(AuthEventKind::InitialSession, None),
            AuthChangeEvent::new(
                AuthEventKind::SignedIn,
                Some(session("u1", "a@example.com")),
            ),
            AuthChangeEvent::new(
                AuthEventKind::TokenRefreshed,
                Some(session("u1", "a@example.com")),
            ),
            AuthChangeEvent::new(AuthEventKind::SignedOut, None),
        ];

        let mut state = AuthState::restoring();
        for event in &events {
            state = reduce(state, event);
            assert_eq!(state.user.is_some(), event.session.is_some());
        }
    }

    #[test]
    fn restoration_settles_on_first_idle_snapshot() {
        assert!(!restoration_settled(false, &AuthState::restoring()));
        assert!(restoration_settled(false, &AuthState::default()));
        assert!(restoration_settled(true, &AuthState::restoring()));
    }

    #[tokio::test]
    async fn sign_in_after_restoration_stays_settled() {
        let store = SessionStore::new(FakeProvider::default(), ORIGIN);
        let trace = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&trace);
        store.observe(move |state| {
            let already = sink.borrow().last().is_some_and(|(settled, _)| *settled);
            sink.borrow_mut()
                .push((restoration_settled(already, state), state.loading));
        });

        store.initialize().await;
        let result = store.sign_in_with_email("a@example.com", &password()).await;

        assert!(result.is_ok());
        let trace = trace.borrow();
        assert_eq!(trace.first(), Some(&(false, true)));
        let first_settled = trace
            .iter()
            .position(|(settled, _)| *settled)
            .expect("restoration settles");
        assert!(!trace[first_settled].1);
        assert!(trace[first_settled..].iter().all(|(settled, _)| *settled));
        assert!(
            trace[first_settled..].iter().any(|(_, loading)| *loading),
            "sign-in should report loading after restoration"
        );
    }

    #[tokio::test]
    async fn initialize_restores_user_and_ends_loading() {
        let provider = FakeProvider::default();
        provider
            .current_user
            .borrow_mut()
            .push_back(Ok(Some(user("u1", "a@example.com"))));
        let store = SessionStore::new(provider, ORIGIN);
        assert!(store.state().loading);

        store.initialize().await;

        let state = store.state();
        assert!(!state.loading);
        assert!(state.is_authenticated());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn initialize_failure_sets_error_and_leaves_user_empty() {
        let provider = FakeProvider::default();
        provider
            .current_user
            .borrow_mut()
            .push_back(Err(AuthError::Unexpected("offline".to_string())));
        let store = SessionStore::new(provider, ORIGIN);

        store.initialize().await;

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.user, None);
        assert_eq!(state.error.as_deref(), Some("認證初始化失敗"));
    }

    #[tokio::test]
    async fn initialize_provider_error_uses_provider_message() {
        let provider = FakeProvider::default();
        provider
            .current_user
            .borrow_mut()
            .push_back(Err(provider_error("JWT expired")));
        let store = SessionStore::new(provider, ORIGIN);

        store.initialize().await;

        assert_eq!(store.state().error.as_deref(), Some("JWT expired"));
    }

    #[tokio::test]
    async fn sign_in_toggles_loading_and_returns_session() {
        let store = ready_store(FakeProvider::default()).await;
        let trace = loading_trace(&store);

        let result = store.sign_in_with_email("a@example.com", &password()).await;

        assert!(result.is_ok());
        assert_eq!(*trace.borrow(), vec![false, true, false]);
        assert_eq!(store.state().error, None);
    }

    #[tokio::test]
    async fn sign_in_provider_error_is_localized_and_returned_raw() {
        let provider = FakeProvider::default();
        provider
            .sign_in
            .borrow_mut()
            .push_back(Err(provider_error("Invalid login credentials")));
        let store = ready_store(provider).await;

        let result = store.sign_in_with_email("a@example.com", &password()).await;

        let err = result.expect_err("sign-in should fail");
        assert_eq!(err.message, "Invalid login credentials");
        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("電子郵件或密碼錯誤"));
    }

    #[tokio::test]
    async fn sign_in_unexpected_error_uses_generic_message() {
        let provider = FakeProvider::default();
        provider
            .sign_in
            .borrow_mut()
            .push_back(Err(AuthError::Unexpected("network down".to_string())));
        let store = ready_store(provider).await;

        let err = store
            .sign_in_with_email("a@example.com", &password())
            .await
            .expect_err("sign-in should fail");

        assert_eq!(err.message, "登入失敗，請稍後再試");
        assert_eq!(store.state().error.as_deref(), Some("登入失敗，請稍後再試"));
        assert!(!store.state().loading);
    }

    #[tokio::test]
    async fn sign_up_unexpected_error_uses_register_message() {
        let provider = FakeProvider::default();
        provider
            .sign_up
            .borrow_mut()
            .push_back(Err(AuthError::Unexpected("network down".to_string())));
        let store = ready_store(provider).await;
        let trace = loading_trace(&store);

        let err = store
            .sign_up_with_email("a@example.com", &password())
            .await
            .expect_err("sign-up should fail");

        assert_eq!(err.message, "註冊失敗，請稍後再試");
        assert_eq!(*trace.borrow(), vec![false, true, false]);
    }

    #[tokio::test]
    async fn sign_up_without_confirmation_returns_user_only() {
        let store = ready_store(FakeProvider::default()).await;

        let outcome = store
            .sign_up_with_email("new@example.com", &password())
            .await
            .expect("sign-up should succeed");

        assert_eq!(outcome.user.email.as_deref(), Some("new@example.com"));
        assert_eq!(outcome.session, None);
        assert!(!store.state().is_authenticated());
    }

    #[tokio::test]
    async fn oauth_never_sets_loading() {
        let provider = FakeProvider::default();
        provider
            .oauth
            .borrow_mut()
            .push_back(Err(provider_error("access_denied")));
        let store = ready_store(provider).await;
        let trace = loading_trace(&store);

        let _ = store.sign_in_with_google().await;
        let _ = store.sign_in_with_line().await;

        assert!(trace.borrow().iter().all(|loading| !loading));
    }

    #[tokio::test]
    async fn oauth_errors_are_mapped_per_provider() {
        let provider = FakeProvider::default();
        provider
            .oauth
            .borrow_mut()
            .push_back(Err(provider_error("server_error")));
        provider
            .oauth
            .borrow_mut()
            .push_back(Err(AuthError::Unexpected("boom".to_string())));
        let store = ready_store(provider).await;

        let _ = store.sign_in_with_line().await;
        assert_eq!(
            store.state().error.as_deref(),
            Some("Line 伺服器錯誤，請稍後再試")
        );

        let err = store.sign_in_with_google().await.expect_err("should fail");
        assert_eq!(err.message, "Google 登入失敗");
        assert_eq!(store.state().error.as_deref(), Some("Google 登入失敗"));
    }

    #[tokio::test]
    async fn oauth_requests_carry_provider_options() {
        let store = ready_store(FakeProvider::default()).await;

        let redirect = store.sign_in_with_google().await.expect("should redirect");
        assert_eq!(redirect.provider, OAuthProvider::Google);
        store.sign_in_with_line().await.expect("should redirect");

        let requests = store.provider.oauth_requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].redirect_to, "https://app.example.com/dashboard");
        assert_eq!(requests[0].scopes, "email profile");
        assert_eq!(requests[1].scopes, "profile openid email");
    }

    #[tokio::test]
    async fn oauth_clears_previous_error_before_attempting() {
        let store = ready_store(FakeProvider::default()).await;
        store.update(|state| state.error = Some("stale".to_string()));

        store.sign_in_with_google().await.expect("should redirect");

        assert_eq!(store.state().error, None);
    }

    #[tokio::test]
    async fn sign_out_failures_surface_messages() {
        let provider = FakeProvider::default();
        provider
            .sign_out
            .borrow_mut()
            .push_back(Err(provider_error("Session not found")));
        provider
            .sign_out
            .borrow_mut()
            .push_back(Err(AuthError::Unexpected("offline".to_string())));
        let store = ready_store(provider).await;

        assert!(store.sign_out().await.is_err());
        assert_eq!(store.state().error.as_deref(), Some("Session not found"));

        assert!(store.sign_out().await.is_err());
        assert_eq!(store.state().error.as_deref(), Some("登出失敗"));
    }

    #[tokio::test]
    async fn clear_error_only_resets_error() {
        let store = ready_store(FakeProvider::default()).await;
        store.apply(&AuthChangeEvent::new(
            AuthEventKind::SignedIn,
            Some(session("u1", "a@example.com")),
        ));
        store.update(|state| state.error = Some("oops".to_string()));

        store.clear_error();

        let state = store.state();
        assert_eq!(state.error, None);
        assert!(state.is_authenticated());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn run_applies_events_until_shutdown() {
        let store = SessionStore::new(FakeProvider::default(), ORIGIN);

        let driver = async {
            tokio::task::yield_now().await;
            store
                .sign_in_with_email("a@example.com", &password())
                .await
                .expect("sign-in should succeed");
            tokio::task::yield_now().await;
            assert!(store.state().is_authenticated());

            store.sign_out().await.expect("sign-out should succeed");
            tokio::task::yield_now().await;
            assert!(!store.state().is_authenticated());

            store.shutdown();
        };

        futures::join!(store.run(), driver);

        assert_eq!(store.provider.hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn shutdown_ignores_late_events() {
        let store = ready_store(FakeProvider::default()).await;
        let trace = loading_trace(&store);

        store.shutdown();
        store.apply(&AuthChangeEvent::new(
            AuthEventKind::SignedIn,
            Some(session("u1", "a@example.com")),
        ));

        assert!(!store.state().is_authenticated());
        assert_eq!(trace.borrow().len(), 1);
    }
}
