//! Freelance Tracker is a small web app for keeping track of a freelancer's
//! client invoices, salary payments and treasury draws.
//!
//! Transactions live in a hosted `transactions` table that is accessed over
//! its REST interface through the [LedgerStore]. The library also provides a
//! password-gated dashboard that serves HTML pages directly.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod config;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
pub mod ledger;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{Config, TableConfig};
pub use ledger::LedgerStore;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required setting is missing or malformed.
    ///
    /// This error is fatal: the server refuses to start and the ledger store
    /// is never constructed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The remote table service rejected or failed a request.
    ///
    /// Covers network and auth failures as well as constraint violations
    /// such as a duplicate transaction ID. The message is intended for the
    /// server logs, clients should be shown a generic message instead.
    #[error("the table service request failed: {0}")]
    Persistence(String),

    /// A transaction was built with a negative amount.
    #[error("the amount {0} is negative, amounts must be zero or greater")]
    NegativeAmount(Decimal),

    /// A commission percentage outside of 0 to 100 was used.
    #[error("the commission percentage {0} must be between 0 and 100")]
    InvalidCommissionPercent(Decimal),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The password entered on the log-in page does not match the dashboard password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The session cookie is missing, has expired or could not be read.
    #[error("invalid session: {0}")]
    InvalidSession(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Persistence(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Persistence(_) => {
                tracing::error!("An error occurred while talking to the table service: {self}");
                InternalServerError {
                    description: "Could not reach your ledger",
                    fix: "The transaction table could not be read. Check the server logs and \
                    the table service settings, then try again.",
                }
                .into_response()
            }
            Error::InvalidTimezone(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    &format!("{amount} is negative. Enter the amount as a positive number."),
                ),
            ),
            Error::InvalidCommissionPercent(percent) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid commission",
                    &format!("{percent}% is not a valid commission, use a value from 0 to 100."),
                ),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Transaction not found",
                    "The transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::Persistence(ref message) => {
                tracing::error!("Table service request failed: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::error(
                        "Could not save your changes",
                        "The transaction table rejected the request, check the server logs for more details.",
                    ),
                )
            }
            Error::InvalidTimezone(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rust_decimal_macros::dec;

    use crate::Error;

    #[test]
    fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn persistence_error_renders_500_page() {
        let response = Error::Persistence("connection refused".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_render_bad_request_alerts() {
        let negative = Error::NegativeAmount(dec!(-1)).into_alert_response();
        let percent = Error::InvalidCommissionPercent(dec!(101)).into_alert_response();

        assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
        assert_eq!(percent.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn persistence_error_alert_is_bad_gateway() {
        let response = Error::Persistence("duplicate key".to_owned()).into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
