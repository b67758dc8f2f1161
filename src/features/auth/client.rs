//! Browser identity client for the hosted auth service. It keeps the session
//! in local storage, refreshes it before expiry and completes PKCE redirects
//! when the page loads with an authorization code. Tokens and passwords pass
//! through here and must never be logged.

use super::browser;
use super::pkce;
use super::provider::{AuthError, AuthEventHub, IdentityProvider, Subscription};
use super::types::{
    AuthChangeEvent, AuthEventKind, OAuthRedirect, OAuthRequest, Session, SignUpOutcome, User,
};
use super::wire::{self, PasswordGrant, PkceGrant, RefreshGrant};
use crate::app_lib::{
    AppError,
    api::{get_json_with_headers, post_empty_with_headers, post_json_with_headers_response},
    config::AppConfig,
};
use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use tracing::{debug, info, warn};

/// Refresh the access token when it expires within this many seconds.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub struct GoTrueClient {
    anon_key: String,
    auth_base_url: String,
    storage_key: String,
    session: RefCell<Option<Session>>,
    initialized: Cell<bool>,
    hub: AuthEventHub,
}

impl GoTrueClient {
    /// Creates a client and restores any persisted session.
    pub fn new(config: &AppConfig) -> Self {
        let storage_key = config.storage_key();
        let session = browser::load::<Session>(&storage_key);
        debug!(restored = session.is_some(), "identity client created");
        Self {
            anon_key: config.supabase_anon_key.clone(),
            auth_base_url: config.auth_base_url(),
            storage_key,
            session: RefCell::new(session),
            initialized: Cell::new(false),
            hub: AuthEventHub::new(),
        }
    }

    fn verifier_key(&self) -> String {
        format!("{}-code-verifier", self.storage_key)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.auth_base_url)
    }

    /// Every request carries the project key; user calls also carry the
    /// access token, anonymous ones repeat the project key as bearer.
    fn headers(&self, access_token: Option<&str>) -> Vec<(String, String)> {
        let bearer = access_token.unwrap_or(&self.anon_key);
        vec![
            ("apikey".to_string(), self.anon_key.clone()),
            ("Authorization".to_string(), format!("Bearer {bearer}")),
        ]
    }

    fn commit(&self, session: Session, kind: AuthEventKind) {
        browser::save(&self.storage_key, &session);
        self.session.replace(Some(session.clone()));
        self.hub.emit(&AuthChangeEvent::new(kind, Some(session)));
    }

    fn discard(&self) {
        browser::remove(&self.storage_key);
        self.session.replace(None);
        self.hub
            .emit(&AuthChangeEvent::new(AuthEventKind::SignedOut, None));
    }

    async fn token_grant<B: Serialize>(&self, grant_type: &str, body: &B) -> Result<Session, AppError> {
        let url = self.endpoint(&format!("/token?grant_type={grant_type}"));
        let session: Session =
            post_json_with_headers_response(&url, body, &self.headers(None)).await?;
        Ok(session.with_expiry_from(Utc::now()))
    }

    /// Completes a PKCE redirect when the page was opened with `?code=`.
    async fn exchange_callback_code(&self) -> Result<(), AuthError> {
        let Some(code) = wire::callback_code(&browser::search()) else {
            return Ok(());
        };
        let verifier_key = self.verifier_key();
        let Some(verifier) = browser::load_string(&verifier_key) else {
            warn!("authorization code present without a stored verifier");
            return Ok(());
        };
        browser::remove(&verifier_key);
        browser::strip_query_params(&["code"]);

        let grant = PkceGrant {
            auth_code: &code,
            code_verifier: &verifier,
        };
        let session = self.token_grant("pkce", &grant).await?;
        info!("authorization code exchanged");
        self.commit(session, AuthEventKind::SignedIn);
        Ok(())
    }

    /// Returns the stored session, refreshing it first when it is about to
    /// expire. A rejected refresh token signs the user out.
    async fn active_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.session.borrow().clone() else {
            return Ok(None);
        };
        if !session.expires_within(Utc::now(), EXPIRY_MARGIN_SECS) {
            return Ok(Some(session));
        }

        let grant = RefreshGrant {
            refresh_token: &session.refresh_token,
        };
        match self.token_grant("refresh_token", &grant).await {
            Ok(refreshed) => {
                debug!("access token refreshed");
                self.commit(refreshed.clone(), AuthEventKind::TokenRefreshed);
                Ok(Some(refreshed))
            }
            Err(AppError::Http { status, .. }) if (400..500).contains(&status) => {
                warn!(status, "refresh token rejected");
                self.discard();
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn fetch_user(&self) -> Result<Option<User>, AuthError> {
        let Some(session) = self.active_session().await? else {
            return Ok(None);
        };
        let user: User = get_json_with_headers(
            &self.endpoint("/user"),
            &self.headers(Some(&session.access_token)),
        )
        .await?;
        Ok(Some(user))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for GoTrueClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        let grant = PasswordGrant {
            email,
            password: password.expose_secret(),
        };
        let session = self.token_grant("password", &grant).await?;
        self.commit(session.clone(), AuthEventKind::SignedIn);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<SignUpOutcome, AuthError> {
        let body = PasswordGrant {
            email,
            password: password.expose_secret(),
        };
        let response: serde_json::Value =
            post_json_with_headers_response(&self.endpoint("/signup"), &body, &self.headers(None))
                .await?;
        let outcome = wire::decode_sign_up(response, Utc::now())?;
        if let Some(session) = &outcome.session {
            self.commit(session.clone(), AuthEventKind::SignedIn);
        }
        Ok(outcome)
    }

    async fn sign_in_with_oauth(&self, request: &OAuthRequest) -> Result<OAuthRedirect, AuthError> {
        let verifier = pkce::generate_code_verifier();
        let challenge = pkce::generate_code_challenge(&verifier);
        let url = wire::authorize_url(&self.auth_base_url, request, &challenge)?;
        browser::save_string(&self.verifier_key(), &verifier)?;
        browser::assign(&url)?;
        Ok(OAuthRedirect {
            provider: request.provider,
            url,
        })
    }

    /// Revokes the session server-side, then forgets it locally. A session
    /// the server no longer knows is still cleared.
    async fn sign_out(&self) -> Result<(), AuthError> {
        let access_token = self
            .session
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone());
        if let Some(access_token) = access_token {
            let result =
                post_empty_with_headers(&self.endpoint("/logout"), &self.headers(Some(&access_token)))
                    .await;
            match result {
                Ok(()) => {}
                Err(AppError::Http {
                    status: 401 | 403 | 404,
                    ..
                }) => debug!("session already revoked"),
                Err(err) => return Err(err.into()),
            }
        }
        self.discard();
        Ok(())
    }

    /// The first call also completes a pending redirect sign-in and then
    /// announces the restored session to subscribers.
    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        if !self.initialized.replace(true) {
            self.exchange_callback_code().await?;
            let user = self.fetch_user().await?;
            let session = self.session.borrow().clone();
            self.hub
                .emit(&AuthChangeEvent::new(AuthEventKind::InitialSession, session));
            return Ok(user);
        }
        self.fetch_user().await
    }

    fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }
}
