//! Identity types exchanged with the auth service. `Session` carries bearer
//! and refresh tokens, so its `Debug` output is redacted and it must never be
//! logged field by field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile metadata supplied by the sign-up flow or the OAuth provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_user_id: Option<String>,
}

/// Server-controlled metadata; `provider` names the first sign-in method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub providers: Vec<String>,
}

/// Read-only projection of the provider's user record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub app_metadata: AppMetadata,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Provider-issued credential bundle. Token contents are opaque here; only the
/// expiry is read to decide when to refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix timestamp (seconds) at which the access token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fills in `expires_at` from `expires_in` when the service omitted it.
    #[must_use]
    pub fn with_expiry_from(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now.timestamp() + self.expires_in);
        }
        self
    }

    /// True when the access token expires within `margin_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, margin_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - now.timestamp() <= margin_secs)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.id)
            .finish()
    }
}

/// Kinds of auth-change notifications pushed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl AuthEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
        }
    }
}

impl fmt::Display for AuthEventKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A typed auth-change notification; the session is the provider's current
/// truth at the time of the event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChangeEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthChangeEvent {
    #[must_use]
    pub fn new(kind: AuthEventKind, session: Option<Session>) -> Self {
        Self { kind, session }
    }
}

/// Federated sign-in providers offered on the login screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Line,
}

impl OAuthProvider {
    /// Provider identifier understood by the auth service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Line => "line",
        }
    }

    /// Builds the redirect request for this provider. Both return to the
    /// dashboard on `origin`.
    #[must_use]
    pub fn request(self, origin: &str) -> OAuthRequest {
        let redirect_to = format!("{}/dashboard", origin.trim_end_matches('/'));
        match self {
            Self::Google => OAuthRequest {
                provider: self,
                redirect_to,
                scopes: "email profile".to_string(),
                query_params: vec![
                    ("access_type".to_string(), "offline".to_string()),
                    ("prompt".to_string(), "consent".to_string()),
                ],
            },
            Self::Line => OAuthRequest {
                provider: self,
                redirect_to,
                scopes: "profile openid email".to_string(),
                query_params: Vec::new(),
            },
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Parameters for a redirect-based OAuth sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthRequest {
    pub provider: OAuthProvider,
    pub redirect_to: String,
    pub scopes: String,
    pub query_params: Vec<(String, String)>,
}

/// Where the browser is being sent to complete an OAuth sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: String,
}

/// Result of a sign-up. `session` is `None` while the address awaits
/// confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: User,
    pub session: Option<Session>,
}

/// Structured error reported by the provider (or synthesized by the session
/// store for unexpected failures). This is the `{ error: { message } }`
/// payload handed back to screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderError {
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<String>,
}

impl ProviderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(formatter, "{} ({status})", self.message),
            None => formatter.write_str(&self.message),
        }
    }
}
