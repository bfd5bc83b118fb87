//! `apprel-pruner` library crate.
//!
//! Bulk selection and deletion of app-release rules and versions that are
//! safe to remove. The binary entrypoint (`apprel-preview`) lives in
//! `main.rs`.

pub mod batch;
pub mod config;
pub mod delete;
pub mod preview;
pub mod pruner;
pub mod selection;

pub use batch::{BatchReport, BatchState, ItemKind};
pub use config::PrunerConfig;
pub use delete::{DeleteFailure, DEFAULT_DELETE_TIMEOUT};
pub use pruner::ReleasePruner;
pub use selection::SelectionReport;
