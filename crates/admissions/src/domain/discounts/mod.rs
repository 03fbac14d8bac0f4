//! Discount Codes

pub mod data;
pub mod errors;
pub mod ledger;
pub mod records;

pub use errors::DiscountError;
pub use ledger::{DiscountLedger, is_valid_code, normalize_code};
