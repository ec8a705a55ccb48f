//! Works out where to send the user once they have logged in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only local paths are followed, and never back to the log-in page.
fn is_safe_redirect_url(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && path != endpoints::LOG_IN_API
}

fn path_and_query(raw_url: &str, allow_absolute: bool) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if !allow_absolute && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Reduce a user supplied redirect URL to a safe local path, or `None` if it points elsewhere.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    path_and_query(raw_url, false)
}

/// The log-in page URL that sends the user back to `redirect_target` afterwards.
pub(super) fn log_in_url_with_redirect(redirect_target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// The log-in page URL for a request that was refused for lack of a session.
///
/// Page requests come back to the requested page. htmx requests to the API
/// come back to the page they were sent from, as given by `HX-Current-URL`.
/// Everything else falls back to the dashboard.
pub(super) fn log_in_url_for_request(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_url(request)
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    let target = target.unwrap_or_else(|| {
        tracing::warn!(
            "No usable redirect target for {}, falling back to the dashboard.",
            request.uri()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    log_in_url_with_redirect(&target)
}

fn hx_current_url(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_htmx = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_htmx {
        return None;
    }

    let current_url = headers.get("hx-current-url")?.to_str().ok()?;

    // htmx sends the full URL of the page, so scheme and host are expected here.
    path_and_query(current_url, true)
}
