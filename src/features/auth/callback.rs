//! OAuth redirect-back handling. The code exchange itself happens in the
//! identity client when it detects the callback URL; this only decides where
//! the user goes next.

use crate::features::paths;
use url::form_urlencoded;

/// Query parameter carrying a provider error back to the login screen.
pub const ERROR_PARAM: &str = "error";

/// Query parameters the provider may append to the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parses a query string, with or without the leading `?`. Empty values
    /// count as absent.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "error" => params.error = Some(value.to_string()),
                "error_description" => params.error_description = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Nothing to decide yet; keep showing the progress screen.
    Wait,
    Redirect(String),
}

/// A provider error sends the user back to login with the description (or
/// the bare code) attached; otherwise a restored user goes to the dashboard.
#[must_use]
pub fn resolve(params: &CallbackParams, signed_in: bool) -> CallbackOutcome {
    if let Some(error) = &params.error {
        let reason = params.error_description.as_deref().unwrap_or(error);
        return CallbackOutcome::Redirect(format!(
            "{}?{ERROR_PARAM}={}",
            paths::LOGIN,
            urlencoding::encode(reason)
        ));
    }

    if signed_in {
        CallbackOutcome::Redirect(paths::DASHBOARD.to_string())
    } else {
        CallbackOutcome::Wait
    }
}

#[cfg(test)]
mod tests {
    use super::{CallbackOutcome, CallbackParams, resolve};

    #[test]
    fn provider_error_redirects_to_login_with_description() {
        let params =
            CallbackParams::from_query("?error=access_denied&error_description=User%20denied");
        assert_eq!(
            resolve(&params, false),
            CallbackOutcome::Redirect("/login?error=User%20denied".to_string())
        );
    }

    #[test]
    fn error_wins_over_signed_in_user() {
        let params = CallbackParams::from_query("error=server_error");
        assert_eq!(
            resolve(&params, true),
            CallbackOutcome::Redirect("/login?error=server_error".to_string())
        );
    }

    #[test]
    fn plus_encoded_descriptions_are_decoded_before_reencoding() {
        let params = CallbackParams::from_query("error=x&error_description=Email+link+expired");
        assert_eq!(
            params.error_description.as_deref(),
            Some("Email link expired")
        );
    }

    #[test]
    fn signed_in_user_goes_to_dashboard() {
        let params = CallbackParams::from_query("?code=abc");
        assert_eq!(params, CallbackParams::default());
        assert_eq!(
            resolve(&params, true),
            CallbackOutcome::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn waits_while_no_user_and_no_error() {
        assert_eq!(resolve(&CallbackParams::from_query(""), false), CallbackOutcome::Wait);
        assert_eq!(
            resolve(&CallbackParams::from_query("error="), false),
            CallbackOutcome::Wait
        );
    }
}
