//! Attendance tracker CLI library.
//!
//! This crate provides the CLI interface, configuration and journal access
//! around the `lt-core` pipeline.

mod cli;
pub mod commands;
mod config;
pub mod journal;

pub use cli::{Cli, ColorMode};
pub use config::Config;
