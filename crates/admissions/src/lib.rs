//! Class enrollment admission control for studios.
//!
//! Seats, waitlists, pricing tiers and discount codes for studio classes,
//! with every change to a class serialized through its roster lock.

pub mod clock;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod roster;
pub mod uuids;

#[cfg(test)]
mod test;
