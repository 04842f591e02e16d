//! Column width bookkeeping for boxed expressions.
//!
//! Widths live outside the expression tree, in a flat map keyed by the id of
//! the expression element that owns the columns. Slot 0 is always the row
//! index column; data column `i` maps to slot `i + 1`. Structural edits that
//! add or drop a column must keep the width vector in step, otherwise the
//! remaining entries silently shift onto the wrong columns.

use crate::dmn_model::WidthsMap;

/// Width assigned to a freshly inserted data column.
pub const DEFAULT_COLUMN_WIDTH: f64 = 100.0;

/// Width of the fixed row index column at slot 0.
pub const ROW_INDEX_COLUMN_WIDTH: f64 = 60.0;

/// Returns the recorded width of data column `column` under `id`, or the
/// default when no entry exists.
pub fn column_width(widths: &WidthsMap, id: &str, column: usize) -> f64 {
    widths
        .get(id)
        .and_then(|v| v.get(column + 1))
        .copied()
        .unwrap_or(DEFAULT_COLUMN_WIDTH)
}

/// Records a width for data column `column` under `id`, growing the vector
/// with defaults when the slot does not exist yet.
pub fn set_column_width(widths: &mut WidthsMap, id: &str, column: usize, width: f64) {
    let entry = widths.entry(id.to_string()).or_default();
    ensure_slots(entry, column + 2);
    entry[column + 1] = width;
}

/// Opens a default-width slot for a new data column at `column`. A missing
/// entry is created first so the row index slot is present.
pub fn insert_width_slot(widths: &mut WidthsMap, id: &str, column: usize) {
    let entry = widths.entry(id.to_string()).or_default();
    ensure_slots(entry, column + 1);
    entry.insert(column + 1, DEFAULT_COLUMN_WIDTH);
}

/// Drops the width slot of data column `column`. Out-of-range slots and
/// missing entries are left untouched.
pub fn remove_width_slot(widths: &mut WidthsMap, id: &str, column: usize) {
    if let Some(entry) = widths.get_mut(id) {
        let slot = column + 1;
        if slot < entry.len() {
            entry.remove(slot);
        }
    }
}

/// Removes the whole width entry of a deleted expression element.
pub fn drop_width_entry(widths: &mut WidthsMap, id: &str) {
    widths.remove(id);
}

fn ensure_slots(entry: &mut Vec<f64>, len: usize) {
    if entry.is_empty() {
        entry.push(ROW_INDEX_COLUMN_WIDTH);
    }
    while entry.len() < len {
        entry.push(DEFAULT_COLUMN_WIDTH);
    }
}
