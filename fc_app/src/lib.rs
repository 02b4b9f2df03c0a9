//! # fc_app
//!
//! Shared utilities for the calculator bot process: logging, config and the
//! keep-alive task.

pub mod config_loader;
pub mod keep_alive;
pub mod tracing_setup;
