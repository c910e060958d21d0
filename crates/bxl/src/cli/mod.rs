//! Command handlers for the bxl CLI.

pub mod config;
pub mod remove;
pub mod rename;
pub mod report;
pub mod resize;
pub mod transform;
pub mod unique;
