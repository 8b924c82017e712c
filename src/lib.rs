//! Resume View Counter — Shared Library
//!
//! This crate contains the counter logic, store backends, and
//! response models used by the serverless handlers.
//!
//! Each serverless function in `api/` imports from this library
//! to keep handlers thin and logic reusable.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod models;
pub mod store;
pub mod telemetry;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
