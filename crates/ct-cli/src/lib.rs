//! CLI library components for the controlled terminology report writer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
