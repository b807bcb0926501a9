pub mod build;
pub mod ignore;
pub mod loader;
pub mod stats;
pub mod store;
pub mod types;

pub use build::IndexBuilder;
pub use ignore::IgnorePolicy;
pub use loader::FileLoader;
pub use store::{IndexStore, Snapshot};
pub use types::*;
