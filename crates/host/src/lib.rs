//! Seams onto the host admin application.
//!
//! The pruner never owns release data. It talks to the host through:
//!
//! - [`grid::Grid`] -- row source and selection of the two grids
//! - [`api::ReleaseApi`] -- delete calls, data reloads, app context
//! - [`invoke::InvokeSlot`] -- the host's single shared completion channel

pub mod api;
pub mod grid;
pub mod invoke;

pub use api::{
    AppRef, DeleteVersionCallback, DeleteVersionResponse, ReleaseApi, VersionCoordinates,
    VersionMethod,
};
pub use grid::{Grid, MemoryGrid};
pub use invoke::{
    InvokeHandler, InvokeMessage, InvokeResponse, InvokeSlot, InvokeSlotError, Interception,
};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
