//! Reads and validates the settings the server needs before it can start.

use std::fmt::Debug;

use reqwest::Url;

use crate::{Error, timezone::get_local_offset};

/// The environment variable holding the project URL of the table service.
pub const URL_VAR: &str = "SUPABASE_URL";
/// The environment variable holding the access key of the table service.
pub const KEY_VAR: &str = "SUPABASE_KEY";
/// The environment variable holding the dashboard password.
pub const PASSWORD_VAR: &str = "STREAMLIT_PASSWORD";
/// An alternative name for [PASSWORD_VAR].
pub const PASSWORD_FALLBACK_VAR: &str = "DASHBOARD_PASSWORD";
/// The environment variable holding the secret used to encrypt session cookies.
pub const SECRET_VAR: &str = "SECRET";
/// The environment variable holding the canonical name of the local timezone.
pub const TIMEZONE_VAR: &str = "TIMEZONE";

/// The timezone used when [TIMEZONE_VAR] is not set.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

const URL_HOST_SUFFIX: &str = ".supabase.co";

/// Where the transactions table lives and how to access it.
#[derive(Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// The project URL, e.g. "https://abcdefgh.supabase.co".
    pub url: String,
    /// The key sent with every request.
    pub key: String,
}

impl Debug for TableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableConfig")
            .field("url", &self.url)
            .field("key", &"********")
            .finish()
    }
}

/// The validated settings for the server.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// The location of and credentials for the transactions table.
    pub table: TableConfig,
    /// The password that unlocks the dashboard.
    pub dashboard_password: String,
    /// The secret for encrypting session cookies, if one was configured.
    pub cookie_secret: Option<String>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("table", &self.table)
            .field("dashboard_password", &"********")
            .field("cookie_secret", &self.cookie_secret.as_ref().map(|_| "********"))
            .field("local_timezone", &self.local_timezone)
            .finish()
    }
}

impl Config {
    /// Read the settings from the process environment.
    ///
    /// # Errors
    /// Returns an [Error::Configuration] naming the first setting that is
    /// missing or malformed.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the settings with `lookup`, which returns the value of a variable by name.
    ///
    /// Values are trimmed and empty values are treated as missing.
    ///
    /// # Errors
    /// Returns an [Error::Configuration] naming the first setting that is
    /// missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let url = get(URL_VAR)
            .ok_or_else(|| Error::Configuration(format!("{URL_VAR} must be set")))?;
        validate_url(&url)?;

        let key = get(KEY_VAR)
            .ok_or_else(|| Error::Configuration(format!("{KEY_VAR} must be set")))?;

        let dashboard_password = get(PASSWORD_VAR)
            .or_else(|| get(PASSWORD_FALLBACK_VAR))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{PASSWORD_VAR} (or {PASSWORD_FALLBACK_VAR}) must be set to protect the dashboard"
                ))
            })?;

        let local_timezone = get(TIMEZONE_VAR).unwrap_or_else(|| DEFAULT_TIMEZONE.to_owned());
        if get_local_offset(&local_timezone).is_none() {
            return Err(Error::Configuration(format!(
                "{TIMEZONE_VAR} \"{local_timezone}\" is not a canonical timezone name"
            )));
        }

        Ok(Self {
            table: TableConfig { url, key },
            dashboard_password,
            cookie_secret: get(SECRET_VAR),
            local_timezone,
        })
    }
}

fn validate_url(raw_url: &str) -> Result<(), Error> {
    let url = Url::parse(raw_url)
        .map_err(|error| Error::Configuration(format!("{URL_VAR} is not a valid URL: {error}")))?;

    if url.scheme() != "https" {
        return Err(Error::Configuration(format!(
            "{URL_VAR} must use https, got \"{}\"",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if host.ends_with(URL_HOST_SUFFIX) && host.len() > URL_HOST_SUFFIX.len() => {
            Ok(())
        }
        _ => Err(Error::Configuration(format!(
            "{URL_VAR} must point to a project on {}, got \"{raw_url}\"",
            &URL_HOST_SUFFIX[1..]
        ))),
    }
}
