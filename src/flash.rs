//! One-shot messages that survive a redirect.
//!
//! A flash is written to a private cookie by the handler that redirects and
//! removed by the page that displays it.

use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use serde::{Deserialize, Serialize};

/// The name of the cookie holding the pending flash message.
pub(crate) const COOKIE_FLASH: &str = "flash";

/// How a flash message should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// A message to show the user on the next page they view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

/// Store `flash` in the cookie jar, replacing any pending message.
pub fn set_flash(jar: PrivateCookieJar, flash: Flash) -> PrivateCookieJar {
    match serde_json::to_string(&flash) {
        Ok(value) => jar.add(
            Cookie::build((COOKIE_FLASH, value))
                .path("/")
                .http_only(true),
        ),
        Err(error) => {
            tracing::error!("Could not serialize flash message: {error}");
            jar
        }
    }
}

/// Remove the pending flash message from the cookie jar and return it.
///
/// A cookie that cannot be read is removed and treated as no message.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let flash = serde_json::from_str(cookie.value_trimmed())
        .inspect_err(|error| tracing::debug!("Discarding unreadable flash cookie: {error}"))
        .ok();

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), flash)
}
