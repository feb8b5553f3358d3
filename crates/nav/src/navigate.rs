//! Traversal decisions.

use crate::{Caret, CellRegistry, GridPos, Modifiers, NavKey};

/// Grid navigator. The only policy knob is Tab row wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    /// When Tab runs out of editable cells in a row, continue onto the
    /// next/previous row instead of stopping at the row edge.
    pub wrap_tab: bool,
}

impl Navigator {
    pub fn new(wrap_tab: bool) -> Self {
        Navigator { wrap_tab }
    }

    /// Decide the target cell for a keystroke and move focus there.
    /// Returns the new position, or `None` when focus stays put.
    pub fn handle_key<R: CellRegistry + ?Sized>(
        &self,
        registry: &mut R,
        from: GridPos,
        key: NavKey,
        mods: Modifiers,
        caret: Caret,
    ) -> Option<GridPos> {
        let target = next_position(registry, from, key, mods, caret, self.wrap_tab)?;
        registry.focus(target).then_some(target)
    }
}

/// Pure traversal decision over a registry snapshot.
pub fn next_position<R: CellRegistry + ?Sized>(
    registry: &R,
    from: GridPos,
    key: NavKey,
    mods: Modifiers,
    caret: Caret,
    wrap_tab: bool,
) -> Option<GridPos> {
    match key {
        NavKey::Left => {
            if !caret.at_start && !mods.ctrl_alt {
                // Caret still has text to its left; leave the arrow to the field.
                return None;
            }
            scan(registry, from, 0, -1)
        }
        NavKey::Right => {
            if !caret.at_end && !mods.ctrl_alt {
                return None;
            }
            scan(registry, from, 0, 1)
        }
        NavKey::Up => scan(registry, from, -1, 0),
        NavKey::Down => scan(registry, from, 1, 0),
        NavKey::Tab => {
            let dc = if mods.shift { -1 } else { 1 };
            match scan(registry, from, 0, dc) {
                Some(pos) => Some(pos),
                None if wrap_tab => wrap_rows(registry, from, dc),
                None => None,
            }
        }
        NavKey::Enter => {
            let dr: i64 = if mods.shift { -1 } else { 1 };
            // One row, no skip, no wrap.
            let target = step(registry, from, dr, 0)?;
            registry.is_focusable(target).then_some(target)
        }
    }
}

/// Step repeatedly in one direction until an editable cell or the edge.
fn scan<R: CellRegistry + ?Sized>(
    registry: &R,
    from: GridPos,
    dr: i64,
    dc: i64,
) -> Option<GridPos> {
    let mut pos = from;
    loop {
        pos = step(registry, pos, dr, dc)?;
        if registry.is_focusable(pos) {
            return Some(pos);
        }
    }
}

/// Continue a Tab scan onto following/preceding rows, entering each row
/// from its first (forward) or last (backward) column.
fn wrap_rows<R: CellRegistry + ?Sized>(registry: &R, from: GridPos, dc: i64) -> Option<GridPos> {
    let rows = registry.row_count();
    let cols = registry.col_count();
    if rows == 0 || cols == 0 {
        return None;
    }

    let mut row = from.row;
    loop {
        row = if dc > 0 {
            if row + 1 >= rows {
                return None;
            }
            row + 1
        } else {
            row.checked_sub(1)?
        };

        let entry = if dc > 0 { 0 } else { cols - 1 };
        let pos = GridPos::new(row, entry);
        if registry.is_focusable(pos) {
            return Some(pos);
        }
        // Entry cell not editable: keep scanning within this row before
        // falling through to the next one.
        if let Some(found) = scan(registry, pos, 0, dc) {
            return Some(found);
        }
    }
}

/// One bounded step. `None` at the grid edge.
fn step<R: CellRegistry + ?Sized>(
    registry: &R,
    from: GridPos,
    dr: i64,
    dc: i64,
) -> Option<GridPos> {
    let row = from.row as i64 + dr;
    let col = from.col as i64 + dc;
    if row < 0 || col < 0 || row >= registry.row_count() as i64 || col >= registry.col_count() as i64
    {
        return None;
    }
    Some(GridPos::new(row as usize, col as usize))
}
