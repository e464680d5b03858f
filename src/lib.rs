//! Wren Bundle Maintenance Library
//!
//! This library provides the core functionality for the `wrenkit` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
