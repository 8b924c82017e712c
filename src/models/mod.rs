//! Domain models for the view counter.
//!
//! These types are shared across all modules: store, handler, and the
//! serverless entry points.

pub mod counter;
pub mod response;
