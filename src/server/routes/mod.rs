//! HTTP route modules

pub mod envelope;
pub mod requests;
