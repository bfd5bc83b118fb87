//! Domain logic for pruning app releases.
//!
//! Pure functions and types with no host or I/O dependencies:
//!
//! - [`version`] -- `major.minor.patch` parsing and comparison
//! - [`models`] -- rule and version rows as the host serializes them
//! - [`baseline`] -- row snapshots, grid order checks, released baseline
//! - [`eligibility`] -- which rules and versions are safe to delete

pub mod baseline;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod types;
pub mod version;

pub use error::CoreError;
