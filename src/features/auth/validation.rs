//! Client-side form checks. Failures here block submission and never reach
//! the session store.

use super::password::PasswordStrength;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Trims surrounding whitespace; the provider lowercases addresses itself.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Loose `local@domain.tld` shape check.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    EMAIL_SHAPE
        .as_ref()
        .is_some_and(|regex| regex.is_match(email_normalized))
}

/// Match indicator state; an empty confirmation is not flagged yet.
#[must_use]
pub fn passwords_match(password: &str, confirm: &str) -> bool {
    confirm.is_empty() || password == confirm
}

/// Registration may be submitted once every field is filled, the email
/// looks valid, the confirmation equals the password and the password is
/// strong enough.
#[must_use]
pub fn registration_ready(
    email: &str,
    password: &str,
    confirm: &str,
    strength: &PasswordStrength,
) -> bool {
    let email = normalize_email(email);
    !email.is_empty()
        && valid_email(&email)
        && !password.is_empty()
        && !confirm.is_empty()
        && password == confirm
        && strength.is_acceptable()
}

/// Login only needs both fields filled.
#[must_use]
pub fn login_ready(email: &str, password: &str) -> bool {
    !normalize_email(email).is_empty() && !password.is_empty()
}
