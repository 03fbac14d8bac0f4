//! Studio Admissions Domain Concerns

pub mod admissions;
pub mod classes;
pub mod discounts;
pub mod pricing;
pub mod studios;
pub mod waitlist;
