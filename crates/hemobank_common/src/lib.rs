//! Hemobank Common - shared types, storage and search translation
//!
//! Everything the CLI needs: the SQLite store and its ledger operations,
//! the free-text query translator, validation, configuration and terminal
//! output helpers.

pub mod blood_group;
pub mod config;
pub mod display;
pub mod intent;
pub mod ledger;
pub mod store;
pub mod types;
pub mod validate;

pub use blood_group::BloodGroup;
pub use config::BankConfig;
pub use intent::{BoundQuery, QueryTranslator};
pub use ledger::{LedgerError, LotDrain, MAX_ADJUST_QTY, MAX_ORDER_QTY};
pub use store::BloodBankDb;
pub use types::*;
pub use validate::ValidationError;
