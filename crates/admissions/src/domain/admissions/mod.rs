//! Admissions

pub mod data;
pub mod errors;
mod planner;
pub mod records;
pub mod service;

pub(crate) use planner::{SeatRequest, plan_admission};

pub use errors::AdmissionError;
pub use service::*;
