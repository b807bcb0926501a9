//! # wsindex - Incremental Workspace Search Index
//!
//! wsindex scans a project directory in the background, keeps an in-memory,
//! case-insensitive, line-addressable copy of every text file, and answers
//! substring queries against it while the scan is still running.
//!
//! ## Architecture
//!
//! - [`index`] - Ignore tables, file loading, the shared store and the background builder
//! - [`query`] - Query normalization and the substring scan
//! - [`session`] - A per-project [`Workspace`](session::Workspace) tying store and builder together
//! - [`config`] - Limits and extra ignore rules (env > config file > defaults)
//! - [`output`] - Result formatting for the CLI
//! - [`utils`] - App data paths and the indexing spinner
//!
//! ## Quick Start
//!
//! ```no_run
//! use wsindex::config::IndexConfig;
//! use wsindex::session::Workspace;
//!
//! let mut workspace = Workspace::new(&IndexConfig::load()).unwrap();
//! workspace.open("/path/to/project").unwrap();
//!
//! // Partial results are available while indexing continues
//! for result in workspace.search("fn main") {
//!     println!("{}:{}: {}", result.file_path.display(), result.line_number, result.line_text);
//! }
//! ```
//!
//! ## Consistency
//!
//! Every build runs under a generation token. Opening another project bumps the
//! generation, and the store drops any batch written under an older one, so a
//! snapshot never mixes files from two projects.

pub mod config;
pub mod index;
pub mod output;
pub mod query;
pub mod session;
pub mod utils;
