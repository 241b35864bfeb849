//! Dashboard module
//!
//! Provides an overview page showing the totals, charts and most recent
//! transactions. Every handler that changes the data responds with the
//! refreshed dashboard content.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::{DashboardNotice, DashboardState, get_dashboard_page};
pub(crate) use handlers::{dashboard_update_response, mutation_error_response};
