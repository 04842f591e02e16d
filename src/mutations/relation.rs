//! Relation row and column mutators.
//!
//! A relation is rectangular: every row carries exactly one cell per declared
//! column, and every cell is its own tracked text element. Column edits touch
//! every row plus the width map in the same call, so the structure never goes
//! ragged between edits. Errors out of the repository mean the document and
//! repository have diverged; the structure is left as it was at that point.

use crate::dmn_model::{
    InformationItem, LiteralExpression, RelationExpression, RelationRow, WidthsMap,
};
use crate::utils::ids::generate_uuid;
use crate::utils::naming::next_available_prefixed_name;
use crate::variables::VariablesRepository;

use super::errors::MutationError;
use super::widths::{insert_width_slot, remove_width_slot};

/// Insert an empty row at `at` and register each of its cells under `scope`.
/// Returns the new row's id.
pub fn add_relation_row(
    relation: &mut RelationExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    if at > relation.rows.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation row",
            index: at,
            len: relation.rows.len(),
        });
    }
    let mut cells = Vec::with_capacity(relation.columns.len());
    for _ in &relation.columns {
        let cell = LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref: None,
        };
        repository.register_text_cell(&cell.id, scope)?;
        cells.push(cell);
    }
    let row = RelationRow {
        id: generate_uuid(),
        cells,
    };
    let row_id = row.id.clone();
    relation.rows.insert(at, row);
    Ok(row_id)
}

/// Remove the row at `at` along with its cell registrations. The last row
/// stays; at the floor this logs and leaves the relation untouched.
pub fn remove_relation_row(
    relation: &mut RelationExpression,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    if relation.rows.len() <= 1 {
        log::warn!("relation {} keeps its last row", relation.id);
        return Ok(());
    }
    if at >= relation.rows.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation row",
            index: at,
            len: relation.rows.len(),
        });
    }
    for cell in &relation.rows[at].cells {
        repository.remove_variable(&cell.id, true)?;
    }
    relation.rows.remove(at);
    Ok(())
}

/// Duplicate the row at `at` directly below itself. The copy keeps the cell
/// texts but every id is fresh, and each copied cell registers under `scope`
/// like a newly-typed one.
pub fn duplicate_relation_row(
    relation: &mut RelationExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    if at >= relation.rows.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation row",
            index: at,
            len: relation.rows.len(),
        });
    }
    let mut copy = relation.rows[at].clone();
    copy.id = generate_uuid();
    for cell in &mut copy.cells {
        cell.id = generate_uuid();
        repository.register_text_cell(&cell.id, scope)?;
    }
    let row_id = copy.id.clone();
    relation.rows.insert(at + 1, copy);
    Ok(row_id)
}

/// Insert a column at `at`: a fresh `column-N` variable under `scope`, one
/// empty cell in every row at the same index, and a default width slot.
/// Returns the new column's id.
pub fn add_relation_column(
    relation: &mut RelationExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
    widths: &mut WidthsMap,
) -> Result<String, MutationError> {
    if at > relation.columns.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation column",
            index: at,
            len: relation.columns.len(),
        });
    }
    let taken: Vec<String> = relation.columns.iter().map(|c| c.name.clone()).collect();
    let name = next_available_prefixed_name(&taken, "column");
    let column_id = generate_uuid();

    repository.add_variable_to_context(&column_id, &name, scope, None)?;
    for row in &mut relation.rows {
        let cell = LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref: None,
        };
        repository.register_text_cell(&cell.id, scope)?;
        row.cells.insert(at, cell);
    }
    relation.columns.insert(
        at,
        InformationItem {
            id: column_id.clone(),
            name,
            type_ref: None,
        },
    );
    insert_width_slot(widths, &relation.id, at);
    Ok(column_id)
}

/// Remove the column at `at`, the corresponding cell from every row, their
/// registrations, and the width slot. The last column stays; at the floor
/// this logs and leaves the relation untouched.
pub fn remove_relation_column(
    relation: &mut RelationExpression,
    at: usize,
    repository: &mut VariablesRepository,
    widths: &mut WidthsMap,
) -> Result<(), MutationError> {
    if relation.columns.len() <= 1 {
        log::warn!("relation {} keeps its last column", relation.id);
        return Ok(());
    }
    if at >= relation.columns.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation column",
            index: at,
            len: relation.columns.len(),
        });
    }
    repository.remove_variable(&relation.columns[at].id, false)?;
    for row in &mut relation.rows {
        if at < row.cells.len() {
            repository.remove_variable(&row.cells[at].id, true)?;
            row.cells.remove(at);
        }
    }
    relation.columns.remove(at);
    remove_width_slot(widths, &relation.id, at);
    Ok(())
}

/// Set one cell's text and re-scan it, keeping the cached occurrence table in
/// step with the document.
pub fn update_relation_cell(
    relation: &mut RelationExpression,
    row: usize,
    column: usize,
    text: &str,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let rows = relation.rows.len();
    let Some(row) = relation.rows.get_mut(row) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation row",
            index: row,
            len: rows,
        });
    };
    let cells = row.cells.len();
    let Some(cell) = row.cells.get_mut(column) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "relation column",
            index: column,
            len: cells,
        });
    };
    cell.text = text.to_string();
    repository.parse(&cell.id, text);
    Ok(())
}
