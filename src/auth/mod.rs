//! Session management and the log-in, registration and log-out pages.

mod log_in;
mod log_out;
mod middleware;
mod register_user;
mod session;
mod store;
pub(crate) mod token;

pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::{get_log_out_modal, post_log_out};
pub use middleware::{auth_guard, auth_guard_hx};
pub use register_user::{get_register_page, register_user};
pub use session::{Session, SessionManager};
