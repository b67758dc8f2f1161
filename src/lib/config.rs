//! Build-time configuration for the Supabase project with an optional runtime
//! override. The runtime config is read from `window.AUTHDASH_CONFIG` (if
//! present) so static deployments can change endpoints without rebuilding.
//! The anon key is a public client key; do not store secrets here.

use super::errors::AppError;
use url::Url;

/// Log level used when none is configured.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub log_level: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the project URL or anon key is missing
    /// or the URL is not an `http(s)` URL. The app cannot start without them.
    pub fn load() -> Result<Self, AppError> {
        let mut config = Self {
            supabase_url: option_env!("AUTHDASH_SUPABASE_URL")
                .unwrap_or("")
                .to_string(),
            supabase_anon_key: option_env!("AUTHDASH_SUPABASE_ANON_KEY")
                .unwrap_or("")
                .to_string(),
            log_level: option_env!("AUTHDASH_LOG_LEVEL")
                .unwrap_or(DEFAULT_LOG_LEVEL)
                .to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the required Supabase settings are present and usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first missing or invalid value.
    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.supabase_url.trim();
        if url.is_empty() {
            return Err(AppError::Config(
                "Missing Supabase project URL (AUTHDASH_SUPABASE_URL).".to_string(),
            ));
        }
        if self.supabase_anon_key.trim().is_empty() {
            return Err(AppError::Config(
                "Missing Supabase anon key (AUTHDASH_SUPABASE_ANON_KEY).".to_string(),
            ));
        }

        let parsed = Url::parse(url)
            .map_err(|err| AppError::Config(format!("Invalid Supabase project URL: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Supabase project URL must use http or https, got '{}'.",
                parsed.scheme()
            )));
        }

        Ok(())
    }

    /// Base URL of the auth service, without a trailing slash.
    #[must_use]
    pub fn auth_base_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url.trim().trim_end_matches('/'))
    }

    /// Local storage key for the persisted session, scoped to the project
    /// reference the same way the hosted client library names it.
    #[must_use]
    pub fn storage_key(&self) -> String {
        let project_ref = Url::parse(self.supabase_url.trim())
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .and_then(|host| host.split('.').next().map(str::to_string))
            .unwrap_or_else(|| "local".to_string());
        format!("sb-{project_ref}-auth-token")
    }
}

#[derive(Default)]
struct RuntimeConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    log_level: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.supabase_url {
        config.supabase_url = value;
    }
    if let Some(value) = runtime.supabase_anon_key {
        config.supabase_anon_key = value;
    }
    if let Some(value) = runtime.log_level {
        config.log_level = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("AUTHDASH_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        supabase_url: read_runtime_value(&object, "supabase_url"),
        supabase_anon_key: read_runtime_value(&object, "supabase_anon_key"),
        log_level: read_runtime_value(&object, "log_level"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
