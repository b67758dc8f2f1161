//! Request bodies and response decoding for the auth REST endpoints. These
//! payloads carry credentials and tokens, so they must never be logged.

use super::pkce::CHALLENGE_METHOD;
use super::types::{OAuthRequest, Session, SignUpOutcome, User};
use crate::app_lib::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

#[derive(Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
pub struct PkceGrant<'a> {
    pub auth_code: &'a str,
    pub code_verifier: &'a str,
}

/// Builds the provider authorize URL for a PKCE redirect sign-in.
///
/// # Errors
///
/// Returns `AppError::Config` when the auth base URL is not a valid URL.
pub fn authorize_url(
    auth_base_url: &str,
    request: &OAuthRequest,
    code_challenge: &str,
) -> Result<String, AppError> {
    let mut url = Url::parse(&format!("{}/authorize", auth_base_url.trim_end_matches('/')))
        .map_err(|err| AppError::Config(format!("Invalid auth URL: {err}")))?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("provider", request.provider.as_str())
            .append_pair("redirect_to", &request.redirect_to)
            .append_pair("scopes", &request.scopes)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", CHALLENGE_METHOD);
        for (key, value) in &request.query_params {
            query.append_pair(key, value);
        }
    }
    Ok(url.into())
}

/// Decodes a sign-up response, which is a full session when email
/// confirmation is disabled and a bare user otherwise.
///
/// # Errors
///
/// Returns `AppError::Parse` when the body is neither shape.
pub fn decode_sign_up(body: serde_json::Value, now: DateTime<Utc>) -> Result<SignUpOutcome, AppError> {
    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value(body)
            .map_err(|err| AppError::Parse(format!("Failed to decode session: {err}")))?;
        let session = session.with_expiry_from(now);
        return Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    let user: User = serde_json::from_value(body)
        .map_err(|err| AppError::Parse(format!("Failed to decode user: {err}")))?;
    Ok(SignUpOutcome {
        user,
        session: None,
    })
}

/// Extracts the authorization code from a callback query string.
#[must_use]
pub fn callback_code(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
