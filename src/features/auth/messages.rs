//! User-facing (zh-TW) messages for auth failures. Provider messages and OAuth
//! error codes are looked up here; anything unknown falls back to the raw
//! provider text or a per-operation generic message.

use super::types::{OAuthProvider, ProviderError};

pub const LOGIN_FAILED: &str = "登入失敗，請稍後再試";
pub const REGISTER_FAILED: &str = "註冊失敗，請稍後再試";
pub const SIGN_OUT_FAILED: &str = "登出失敗";
pub const INIT_FAILED: &str = "認證初始化失敗";

/// The operation a failure came from; selects the generic fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    SignIn,
    SignUp,
    OAuth(OAuthProvider),
    SignOut,
}

impl Operation {
    /// Message shown when the failure was not reported by the provider.
    #[must_use]
    pub const fn generic_failure(self) -> &'static str {
        match self {
            Self::Initialize => INIT_FAILED,
            Self::SignIn => LOGIN_FAILED,
            Self::SignUp => REGISTER_FAILED,
            Self::OAuth(OAuthProvider::Google) => "Google 登入失敗",
            Self::OAuth(OAuthProvider::Line) => "Line 登入失敗",
            Self::SignOut => SIGN_OUT_FAILED,
        }
    }
}

/// Localizes a credential failure from password sign-in or sign-up, keeping
/// the provider's own text for anything not in the table.
#[must_use]
pub fn credential_error_message(err: &ProviderError) -> String {
    let localized = match err.message.as_str() {
        "Invalid login credentials" => Some("電子郵件或密碼錯誤"),
        "Email not confirmed" => Some("請先確認您的電子郵件"),
        "Too many requests" => Some("嘗試次數過多，請稍後再試"),
        "User already registered" => Some("此電子郵件已被註冊"),
        _ => None,
    };
    localized.map_or_else(|| err.message.clone(), str::to_string)
}

/// Maps an OAuth error code to provider-specific text. `server_error` is only
/// known for Line.
#[must_use]
pub fn oauth_error_message(provider: OAuthProvider, err: &ProviderError) -> String {
    let key = err.code.as_deref().unwrap_or(err.message.as_str());
    let localized = match (provider, key) {
        (OAuthProvider::Google, "popup_closed_by_user") => Some("登入視窗已關閉，請重試"),
        (OAuthProvider::Google, "access_denied") => Some("您拒絕了授權請求"),
        (OAuthProvider::Google, "invalid_request") => Some("OAuth 配置錯誤，請聯絡管理員"),
        (OAuthProvider::Line, "popup_closed_by_user") => Some("Line 登入視窗已關閉，請重試"),
        (OAuthProvider::Line, "access_denied") => Some("您拒絕了 Line 授權請求"),
        (OAuthProvider::Line, "invalid_request") => Some("Line OAuth 配置錯誤，請聯絡管理員"),
        (OAuthProvider::Line, "server_error") => Some("Line 伺服器錯誤，請稍後再試"),
        _ => None,
    };

    match localized {
        Some(message) => message.to_string(),
        None if err.message.trim().is_empty() => {
            Operation::OAuth(provider).generic_failure().to_string()
        }
        None => err.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Operation, credential_error_message, oauth_error_message};
    use crate::features::auth::types::{OAuthProvider, ProviderError};

    fn coded(code: &str, message: &str) -> ProviderError {
        ProviderError {
            message: message.to_string(),
            status: Some(400),
            code: Some(code.to_string()),
        }
    }

    #[test]
    fn credential_errors_are_localized() {
        let err = ProviderError::new("Invalid login credentials");
        assert_eq!(credential_error_message(&err), "電子郵件或密碼錯誤");
        let err = ProviderError::new("Email not confirmed");
        assert_eq!(credential_error_message(&err), "請先確認您的電子郵件");
    }

    #[test]
    fn unknown_credential_errors_keep_provider_text() {
        let err = ProviderError::new("Password should be at least 6 characters");
        assert_eq!(
            credential_error_message(&err),
            "Password should be at least 6 characters"
        );
    }

    #[test]
    fn oauth_codes_map_per_provider() {
        let denied = ProviderError::new("access_denied");
        assert_eq!(
            oauth_error_message(OAuthProvider::Google, &denied),
            "您拒絕了授權請求"
        );
        assert_eq!(
            oauth_error_message(OAuthProvider::Line, &denied),
            "您拒絕了 Line 授權請求"
        );
    }

    #[test]
    fn oauth_code_field_wins_over_message() {
        let err = coded("invalid_request", "Unsupported provider: provider is not enabled");
        assert_eq!(
            oauth_error_message(OAuthProvider::Google, &err),
            "OAuth 配置錯誤，請聯絡管理員"
        );
    }

    #[test]
    fn server_error_is_only_known_for_line() {
        let err = ProviderError::new("server_error");
        assert_eq!(
            oauth_error_message(OAuthProvider::Line, &err),
            "Line 伺服器錯誤，請稍後再試"
        );
        assert_eq!(oauth_error_message(OAuthProvider::Google, &err), "server_error");
    }

    #[test]
    fn empty_oauth_message_falls_back_to_generic() {
        let err = ProviderError::new("  ");
        assert_eq!(oauth_error_message(OAuthProvider::Line, &err), "Line 登入失敗");
        assert_eq!(
            Operation::OAuth(OAuthProvider::Google).generic_failure(),
            "Google 登入失敗"
        );
    }
}
