//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Config, LedgerStore, auth::DEFAULT_SESSION_DURATION};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// How long a session stays valid without any requests.
    pub session_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,

    /// The password that unlocks the dashboard.
    pub dashboard_password: String,

    /// The store for the transactions table.
    pub ledger: LedgerStore,
}

impl AppState {
    /// Create the state for a server that reads and writes transactions through `ledger`.
    ///
    /// If `config` has no cookie secret a random key is generated, so sessions
    /// end when the server restarts.
    pub fn new(config: &Config, ledger: LedgerStore) -> Self {
        let cookie_key = match &config.cookie_secret {
            Some(secret) => create_cookie_key(secret),
            None => {
                tracing::warn!(
                    "No cookie secret configured, sessions will not survive a server restart."
                );
                Key::generate()
            }
        };

        Self {
            cookie_key,
            session_duration: DEFAULT_SESSION_DURATION,
            local_timezone: config.local_timezone.clone(),
            dashboard_password: config.dashboard_password.clone(),
            ledger,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<AppState> for LedgerStore {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
