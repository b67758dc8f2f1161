//! Dashboard projection of a user record: display name, avatar, sign-in
//! method and verification state, plus zh-TW date formatting.

use super::types::User;
use chrono::{DateTime, Datelike, TimeZone, Timelike};

/// Shown when a field is missing.
pub const NOT_AVAILABLE: &str = "N/A";

const FALLBACK_NAME: &str = "用戶";
const EMAIL_PROVIDER: &str = "email";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDisplayInfo {
    pub name: String,
    pub avatar: Option<String>,
    pub provider: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl UserDisplayInfo {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        let metadata = &user.user_metadata;
        let email_local_part = user
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string);

        let name = non_blank(metadata.full_name.as_ref())
            .or_else(|| non_blank(metadata.name.as_ref()))
            .or(email_local_part)
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        let avatar = non_blank(metadata.avatar_url.as_ref())
            .or_else(|| non_blank(metadata.picture.as_ref()));

        let provider = non_blank(user.app_metadata.provider.as_ref())
            .or_else(|| non_blank(metadata.provider.as_ref()))
            .unwrap_or_else(|| EMAIL_PROVIDER.to_string());

        Self {
            name,
            avatar,
            provider,
            email: user.email.clone(),
            email_verified: user.email_confirmed_at.is_some(),
        }
    }

    /// First letter of the display name, for the avatar placeholder.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

/// Human label for a sign-in method.
#[must_use]
pub fn provider_label(provider: &str) -> &str {
    match provider {
        "line" => "Line",
        "google" => "Google",
        "email" => "Email",
        other => other,
    }
}

/// Badge colors for a sign-in method.
#[must_use]
pub fn provider_badge_class(provider: &str) -> &'static str {
    match provider {
        "line" => "bg-green-100 text-green-800",
        "google" => "bg-red-100 text-red-800",
        "email" => "bg-blue-100 text-blue-800",
        _ => "bg-gray-100 text-gray-800",
    }
}

/// First eight characters of the id followed by an ellipsis.
#[must_use]
pub fn short_id(id: &str) -> String {
    if id.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    let prefix: String = id.chars().take(8).collect();
    format!("{prefix}...")
}

/// Long date, e.g. `2024年1月2日`.
#[must_use]
pub fn format_date<Tz: TimeZone>(value: &DateTime<Tz>) -> String {
    format!("{}年{}月{}日", value.year(), value.month(), value.day())
}

/// Short date and time, e.g. `2024年1月2日 15:04`.
#[must_use]
pub fn format_date_time<Tz: TimeZone>(value: &DateTime<Tz>) -> String {
    format!(
        "{} {:02}:{:02}",
        format_date(value),
        value.hour(),
        value.minute()
    )
}
