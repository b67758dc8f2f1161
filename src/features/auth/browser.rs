//! Thin wrappers over `window.localStorage` and `window.location`. Storage
//! failures (private mode, quota) degrade to an in-memory session rather
//! than failing sign-in.

use crate::app_lib::AppError;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

fn window() -> Result<web_sys::Window, AppError> {
    web_sys::window().ok_or_else(|| AppError::Storage("Browser window unavailable.".to_string()))
}

fn local_storage() -> Result<web_sys::Storage, AppError> {
    window()?
        .local_storage()
        .ok()
        .flatten()
        .ok_or_else(|| AppError::Storage("Local storage unavailable.".to_string()))
}

/// Reads and decodes a stored value. Corrupt entries are removed.
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = local_storage().ok()?;
    let raw = storage.get_item(key).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%key, %err, "discarding unreadable stored value");
            let _ = storage.remove_item(key);
            None
        }
    }
}

pub fn load_string(key: &str) -> Option<String> {
    local_storage().ok()?.get_item(key).ok().flatten()
}

pub fn save<T: Serialize>(key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(|err| AppError::Serialization(err.to_string()))
        .and_then(|raw| save_string(key, &raw));
    if let Err(err) = result {
        warn!(%key, %err, "failed to persist value");
    }
}

pub fn save_string(key: &str, value: &str) -> Result<(), AppError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|_| AppError::Storage(format!("Failed to write {key}.")))
}

pub fn remove(key: &str) {
    if let Ok(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Site origin, e.g. `https://app.example.com`.
pub fn origin() -> String {
    window()
        .ok()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

/// Current query string including the leading `?`, or empty.
pub fn search() -> String {
    window()
        .ok()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

/// Sends the browser to an external URL.
pub fn assign(url: &str) -> Result<(), AppError> {
    window()?
        .location()
        .assign(url)
        .map_err(|_| AppError::Config("Failed to open the sign-in page.".to_string()))
}

/// Drops the given query parameters from the address bar without reloading.
pub fn strip_query_params(names: &[&str]) {
    let Ok(window) = window() else {
        return;
    };
    let Ok(href) = window.location().href() else {
        return;
    };
    let Ok(mut url) = url::Url::parse(&href) else {
        return;
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !names.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(url.as_str()),
        );
    }
}
