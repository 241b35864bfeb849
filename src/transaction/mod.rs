//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model as returned by the API
//! - The `TransactionDraft` holding the raw form input and its validation
//! - The modals and endpoints for adding, editing and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod draft;
mod edit_endpoint;
mod form;

pub use core::{Transaction, TransactionId, TransactionKind};
pub use create_endpoint::{create_transaction_endpoint, get_new_transaction_modal};
pub use delete_endpoint::{delete_transaction_endpoint, get_delete_transaction_modal};
pub use draft::{TransactionDraft, ValidatedTransaction};
pub use edit_endpoint::{edit_transaction_endpoint, get_edit_transaction_modal};
