//! Log-out route handler that ends the dashboard session and redirects to the log-in page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_session_cookie, endpoints};

/// Invalidate the session cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);
    tracing::info!("Dashboard locked.");

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
