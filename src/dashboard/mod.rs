//! Dashboard module
//!
//! Provides the overview page: headline totals, the monthly evolution chart
//! and the most recent transactions.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
