//! Row pre-pass that fills blank cells next to populated siblings
//!
//! Without it an element whose fields are only partly filled on a row would
//! not be recognised as a new element by the navigator.

use crate::grid::{is_blank, Cell};
use crate::path::Path;
use tracing::debug;

/// Put a placeholder into every blank, non-array cell that shares a
/// repeating group with a populated non-array cell of the same row.
/// Returns the number of placeholders inserted.
pub fn insert_placeholders(columns: &[Option<&Path>], row: &mut Vec<Option<Cell>>) -> usize {
    if row.len() < columns.len() {
        row.resize(columns.len(), None);
    }

    let filled: Vec<&Path> = columns
        .iter()
        .enumerate()
        .filter_map(|(idx, path)| {
            let path = (*path)?;
            (!path.ends_with_array() && !is_blank(row[idx].as_ref())).then_some(path)
        })
        .collect();

    let mut inserted = 0;
    for (idx, path) in columns.iter().enumerate() {
        let Some(path) = path else {
            continue;
        };
        if path.ends_with_array() || !is_blank(row[idx].as_ref()) {
            continue;
        }
        if filled.iter().any(|sibling| sibling.same_parent_group(path)) {
            debug!("adding placeholder value at col={} path={}", idx, path);
            row[idx] = Some(Cell::Placeholder);
            inserted += 1;
        }
    }
    inserted
}
