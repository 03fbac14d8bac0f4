//! Class Offerings

pub mod data;
pub mod errors;
pub mod records;
pub mod service;

pub use errors::CatalogError;
pub use service::*;
