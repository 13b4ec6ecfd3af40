//! Row emission for the tree → grid encoder
//!
//! A record starts on a fresh row. Scalars land on the current row; when the
//! target cell of an array-contained column is already taken the value moves
//! down to the first free row. Each emit returns the furthest row it wrote,
//! and sibling arrays all start from the row their parent started on.

use crate::grid::{Cell, Grid};
use crate::path::{Path, Segment};
use crate::tree::{Node, Scalar};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct Layout<'a> {
    grid: &'a mut Grid,
    columns: &'a [Option<Path>],
    index: HashMap<&'a Path, usize>,
}

impl<'a> Layout<'a> {
    pub fn new(grid: &'a mut Grid, columns: &'a [Option<Path>]) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .filter_map(|(col, path)| path.as_ref().map(|path| (path, col)))
            .collect();
        Self {
            grid,
            columns,
            index,
        }
    }

    /// Emit one record starting on a new row; returns the last row used
    pub fn emit_record(&mut self, record: &Node) -> usize {
        let start = self.grid.height();
        self.grid.ensure_row(start);
        match record {
            Node::Object(fields) => self.emit_object(fields, start, &Path::root()),
            other => {
                warn!("skipping non-object record of kind {}", other.kind());
                start
            }
        }
    }

    fn emit_object(&mut self, fields: &IndexMap<String, Node>, row: usize, prefix: &Path) -> usize {
        let mut reached = row;

        for (name, value) in fields {
            if let Node::Scalar(scalar) = value {
                let path = prefix.child(Segment::Field(name.clone()));
                reached = reached.max(self.put(scalar, row, &path));
            }
        }
        for (name, value) in fields {
            if let Node::Object(child) = value {
                let path = prefix.child(Segment::Field(name.clone()));
                reached = reached.max(self.emit_object(child, row, &path));
            }
        }
        for (name, value) in fields {
            if let Node::Array(items) = value {
                let path = prefix.child(Segment::ArrayField(name.clone()));
                reached = reached.max(self.emit_array(items, row, &path));
            }
        }
        reached
    }

    fn emit_array(&mut self, items: &[Node], start: usize, path: &Path) -> usize {
        let mut row = start;
        for (idx, item) in items.iter().enumerate() {
            row = match item {
                Node::Object(child) => self.emit_object(child, row, path),
                Node::Scalar(scalar) => self.put(scalar, row, path),
                Node::Array(_) => {
                    warn!("nested array under '{}' has no cell form", path);
                    row
                }
            };
            if idx > 0 {
                self.mark_continuation(row, path);
            }
        }
        row
    }

    /// Write a scalar under the column for `path`. Values with no column are
    /// dropped. Returns the row actually written.
    fn put(&mut self, scalar: &Scalar, row: usize, path: &Path) -> usize {
        let Some(&col) = self.index.get(path) else {
            debug!("no header for '{}'; value dropped", path);
            return row;
        };

        let mut target = row;
        if path.contains_array() {
            while self.grid.get(target, col).is_some() {
                target += 1;
            }
        }
        self.grid.set(target, col, Cell::from_scalar(scalar));
        target
    }

    /// On a continuation row of the array at `path`, mark every empty column
    /// that does not belong to a repeating group below the array's parent.
    fn mark_continuation(&mut self, row: usize, path: &Path) {
        let parent = path.parent();
        for (col, header) in self.columns.iter().enumerate() {
            let Some(header) = header else {
                continue;
            };
            let remainder = if parent.is_ancestor_of(header) {
                header.suffix_after(&parent)
            } else {
                header.clone()
            };
            if !remainder.contains_array() && self.grid.get(row, col).is_none() {
                self.grid.set(row, col, Cell::Placeholder);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layout(headers: &[&str], record: serde_json::Value) -> Vec<Vec<Option<Cell>>> {
        let columns: Vec<Option<Path>> = headers.iter().map(|h| Path::parse(h).ok()).collect();
        let mut grid = Grid::new(headers.iter().map(|h| h.to_string()).collect());
        Layout::new(&mut grid, &columns).emit_record(&Node::from(record));
        grid.rows
    }

    fn t(s: &str) -> Option<Cell> {
        Some(Cell::text(s))
    }

    const P: Option<Cell> = Some(Cell::Placeholder);

    #[test]
    fn test_array_elements_take_new_rows() {
        let rows = layout(
            &["id", "addr.city", "items[].sku"],
            json!({"id": "A", "addr": {"city": "X"}, "items": [{"sku": "x"}, {"sku": "y"}]}),
        );
        assert_eq!(rows, vec![vec![t("A"), t("X"), t("x")], vec![P, P, t("y")]]);
    }

    #[test]
    fn test_unknown_field_dropped() {
        let rows = layout(&["id"], json!({"id": "A", "extra": "e"}));
        assert_eq!(rows, vec![vec![t("A")]]);
    }

    #[test]
    fn test_nested_group_marks_enclosing_fields() {
        let rows = layout(
            &["id", "orders[].ref", "orders[].lines[].sku"],
            json!({"id": "A", "orders": [
                {"ref": "R1", "lines": [{"sku": "a"}, {"sku": "b"}]},
                {"ref": "R2", "lines": [{"sku": "c"}]}
            ]}),
        );
        assert_eq!(
            rows,
            vec![
                vec![t("A"), t("R1"), t("a")],
                vec![P, P, t("b")],
                vec![P, t("R2"), t("c")],
            ]
        );
    }

    #[test]
    fn test_sibling_groups_continue_from_furthest_row() {
        let rows = layout(
            &["id", "a[]", "b[]"],
            json!({"id": "A", "a": ["1", "2"], "b": ["x", "y", "z"]}),
        );
        assert_eq!(
            rows,
            vec![
                vec![t("A"), t("1"), t("x")],
                vec![P, t("2"), t("y")],
                vec![P, None, t("z")],
            ]
        );
    }

    #[test]
    fn test_second_record_starts_after_first() {
        let columns: Vec<Option<Path>> =
            ["id", "tags[]"].iter().map(|h| Path::parse(h).ok()).collect();
        let mut grid = Grid::new(vec!["id".into(), "tags[]".into()]);
        let mut layout = Layout::new(&mut grid, &columns);
        assert_eq!(layout.emit_record(&Node::from(json!({"id": "A", "tags": ["x", "y"]}))), 1);
        assert_eq!(layout.emit_record(&Node::from(json!({"id": "B", "tags": ["z"]}))), 2);
        assert_eq!(grid.rows[2], vec![t("B"), t("z")]);
    }
}
