//! Core domain + application logic for the Telegram channel → X relay.
//!
//! This crate is intentionally framework-agnostic. Telegram and the X API
//! live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod relay;

pub use errors::{Error, Result};
