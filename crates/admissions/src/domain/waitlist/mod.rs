//! Waitlist

pub mod data;
mod queue;
pub mod records;
pub mod service;

pub use service::*;
