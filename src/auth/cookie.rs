//! Defines functions for handling the dashboard session with a private cookie.
//!
//! The cookie has no `Expires` attribute so the browser drops it when the
//! session ends. The expiry that the server enforces travels inside the
//! encrypted [SessionToken] instead.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::token::SessionToken};

pub(crate) const COOKIE_TOKEN: &str = "session";

/// How long a session stays valid without any requests.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::minutes(30);

fn build_session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

fn set_session_token(jar: PrivateCookieJar, token: SessionToken) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(&token)
        .map_err(|error| Error::InvalidSession(format!("could not serialize token: {error}")))?;

    Ok(jar.add(build_session_cookie(value)))
}

/// Add a session cookie to the cookie jar, indicating that the password was entered.
///
/// The session expires `duration` from now unless it is extended.
///
/// # Errors
///
/// Returns [Error::InvalidSession] if the session token cannot be serialized.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidSession("session expiry out of range".to_owned()))?;

    set_session_token(jar, SessionToken { expires_at })
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from `jar` and check that it has not expired.
///
/// # Errors
///
/// Returns [Error::InvalidSession] if the cookie is missing, cannot be
/// decrypted or read, or the session has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<SessionToken, Error> {
    let cookie = jar
        .get(COOKIE_TOKEN)
        .ok_or_else(|| Error::InvalidSession("session cookie missing".to_owned()))?;

    let token: SessionToken = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidSession(format!("could not read token: {error}")))?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::InvalidSession("session expired".to_owned()));
    }

    Ok(token)
}

/// Push the expiry of the session in `jar` to the later of now plus
/// `duration` and its current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns [Error::InvalidSession] if there is no valid session in `jar` or
/// the new expiry cannot be represented.
pub(crate) fn extend_session_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidSession("session expiry out of range".to_owned()))?;

    set_session_token(
        jar,
        SessionToken {
            expires_at: max(token.expires_at, new_expiry),
        },
    )
}
