//! Registry seam between the navigator and the view layer.

use crate::GridPos;

/// What the view layer exposes about currently mounted cells.
///
/// The view keeps a map of stable cell identifiers to focusable element
/// handles, populated as cells mount and cleared as they unmount. The
/// navigator only ever sees this trait, so the traversal algorithm stays
/// free of any UI-framework coupling.
pub trait CellRegistry {
    fn row_count(&self) -> usize;

    fn col_count(&self) -> usize;

    /// Whether the cell at `pos` is mounted and editable right now.
    /// Unregistered, read-only, and out-of-range cells are not focusable.
    fn is_focusable(&self, pos: GridPos) -> bool;

    /// Move real focus to `pos`. Returns false when the handle vanished
    /// between the snapshot and the call.
    fn focus(&mut self, pos: GridPos) -> bool;
}
