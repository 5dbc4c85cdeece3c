//! JupiterOne CLI - run a J1QL query and export the results as CSV or JSON lines.
//!
//! This library exposes the core modules for the binary and for integration tests.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod table;
