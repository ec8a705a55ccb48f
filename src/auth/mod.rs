//! The password gate in front of the dashboard.
//!
//! Entering the dashboard password starts a session held in an encrypted
//! cookie. The middleware turns away requests without a live session.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod token;

pub use cookie::DEFAULT_SESSION_DURATION;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
