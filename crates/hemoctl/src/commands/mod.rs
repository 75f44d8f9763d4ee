//! Command implementations
//!
//! Each function prints its own success or failure status; store errors
//! are reported inline at the call that raised them.

pub mod dashboard;
pub mod donors;
pub mod employees;
pub mod hospitals;
pub mod inventory;
pub mod orders;
pub mod search;
pub mod supply;

use hemobank_common::display::{self, Level};

/// Report a failed operation inline
pub(crate) fn report_error(err: &dyn std::fmt::Display) {
    println!("{}", display::status(Level::Error, &err.to_string()));
}

/// Report a successful operation inline
pub(crate) fn report_success(message: &str) {
    println!("{}", display::status(Level::Success, message));
}
