//! Placeholder stripping shared by both directions

use crate::grid::{Cell, Grid};
use crate::tree::{Node, Scalar};

/// Remove placeholders, nulls, and any object or array left empty by that
/// removal. Returns `None` when nothing of the node survives.
pub fn prune(node: Node) -> Option<Node> {
    match node {
        Node::Scalar(Scalar::Placeholder) | Node::Scalar(Scalar::Null) => None,
        Node::Scalar(Scalar::Text(s)) if s.is_empty() => None,
        Node::Scalar(scalar) => Some(Node::Scalar(scalar)),
        Node::Object(map) => {
            let kept: indexmap::IndexMap<String, Node> = map
                .into_iter()
                .filter_map(|(key, value)| prune(value).map(|value| (key, value)))
                .collect();
            (!kept.is_empty()).then_some(Node::Object(kept))
        }
        Node::Array(items) => {
            let kept: Vec<Node> = items.into_iter().filter_map(prune).collect();
            (!kept.is_empty()).then_some(Node::Array(kept))
        }
    }
}

/// Prune each record of a sheet, dropping records that end up empty
pub fn prune_records(records: Vec<Node>) -> Vec<Node> {
    records.into_iter().filter_map(prune).collect()
}

/// Replace every placeholder cell with an empty cell
pub fn clear_placeholders(grid: &mut Grid) {
    for cell in grid.rows.iter_mut().flatten() {
        if matches!(cell, Some(Cell::Placeholder)) {
            *cell = None;
        }
    }
}
