//! Core functionality for the Gateway

pub mod dispatch;
