//! Grid widget seam.
//!
//! The host owns the grids; the pruner only reads rows and reads/replaces
//! the selected row set. [`MemoryGrid`] is a plain in-memory grid for
//! embedding without a UI.

use std::sync::Mutex;

use apprel_core::types::RowIndex;

use crate::lock;

/// A grid widget holding rows of `T`.
pub trait Grid<T>: Send + Sync {
    /// Current rows in display order.
    fn rows(&self) -> Vec<T>;

    /// Indices of the currently selected rows.
    fn selected_rows(&self) -> Vec<RowIndex>;

    /// Replace the selection with exactly `rows`.
    fn set_selected_rows(&self, rows: &[RowIndex]);
}

/// In-memory [`Grid`] implementation.
pub struct MemoryGrid<T> {
    state: Mutex<GridState<T>>,
}

struct GridState<T> {
    rows: Vec<T>,
    selected: Vec<RowIndex>,
}

impl<T: Clone> MemoryGrid<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            state: Mutex::new(GridState {
                rows,
                selected: Vec::new(),
            }),
        }
    }
}

impl<T: Clone + Send> Grid<T> for MemoryGrid<T> {
    fn rows(&self) -> Vec<T> {
        lock(&self.state).rows.clone()
    }

    fn selected_rows(&self) -> Vec<RowIndex> {
        lock(&self.state).selected.clone()
    }

    fn set_selected_rows(&self, rows: &[RowIndex]) {
        let mut state = lock(&self.state);
        let len = state.rows.len();
        state.selected = rows.iter().copied().filter(|&i| i < len).collect();
    }
}
