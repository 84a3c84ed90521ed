//! Integration tests

mod batch_tests;
mod config_tests;
mod request_log_tests;
