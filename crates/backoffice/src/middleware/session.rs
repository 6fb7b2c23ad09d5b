//! Session middleware configuration for the backoffice.
//!
//! In-memory sessions via tower-sessions with strict settings
//! (SameSite=Strict, 24hr inactivity expiry). Sessions only cache the
//! sign-in resolution, so losing them on restart just means signing in
//! again.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::BackofficeConfig;

/// Session cookie name for the backoffice.
pub const SESSION_COOKIE_NAME: &str = "lm_backoffice_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer.
#[must_use]
pub fn create_session_layer(config: &BackofficeConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
