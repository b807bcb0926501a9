//! Utility functions shared by the library and the CLI.
//!
//! - [`app_data`] - Per-user application data directory (config file location)
//! - [`progress`] - Indexing spinner driven by the store's status flag

pub mod app_data;
pub mod progress;

pub use app_data::*;
pub use progress::*;
