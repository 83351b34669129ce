//! CLI interface for netcount
//!
//! This crate provides the command-line front end: argument parsing,
//! session configuration and the capture run that prints the layer report.

pub mod args;
pub mod config;
pub mod run;

pub use args::Cli;
pub use config::SessionConfig;
pub use run::{capture_and_report, run, run_with_registry, Report, BANNER};
