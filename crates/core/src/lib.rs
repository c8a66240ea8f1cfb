//! Core business logic for foodgram-rs.

pub mod constants;
pub mod services;

pub use services::*;
