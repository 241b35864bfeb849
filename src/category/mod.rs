//! Categories group transactions, e.g. 'Food' or 'Salary'.
//! A transaction belongs to exactly one category. Categories can only be
//! created by this client.

mod create;
mod domain;

pub use create::{create_category_endpoint, get_new_category_modal};
pub use domain::{Category, CategoryId, CategoryName, category_name};
