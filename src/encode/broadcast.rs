//! Placeholder broadcast
//!
//! Makes every header path addressable in every record by inserting empty
//! objects, single-element arrays and placeholder leaves where the record has
//! nothing. Existing values of a different shape are left alone.

use crate::path::{Path, Segment};
use crate::tree::{Node, Scalar};
use indexmap::IndexMap;
use tracing::warn;

/// Ensure `record` has a value at `path`. Running it twice changes nothing.
pub fn broadcast(record: &mut Node, path: &Path) {
    match record {
        Node::Object(fields) => fill(fields, path.segments(), path),
        other => warn!("cannot broadcast '{}' into a {}", path, other.kind()),
    }
}

/// Broadcast every path into every record
pub fn broadcast_all(records: &mut [Node], paths: &[&Path]) {
    for record in records.iter_mut() {
        for path in paths {
            broadcast(record, path);
        }
    }
}

fn is_absent(node: Option<&Node>) -> bool {
    matches!(node, None | Some(Node::Scalar(Scalar::Null)))
}

fn fill(fields: &mut IndexMap<String, Node>, segments: &[Segment], full: &Path) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    match (first, rest.is_empty()) {
        (Segment::Field(name), true) => {
            if !fields.contains_key(name) {
                fields.insert(name.clone(), Node::placeholder());
            }
        }
        (Segment::ArrayField(name), true) => {
            let needs_fill = match fields.get(name) {
                Some(Node::Array(items)) => items.is_empty(),
                other => is_absent(other),
            };
            if needs_fill {
                fields.insert(name.clone(), Node::Array(vec![Node::placeholder()]));
            } else if !matches!(fields.get(name), Some(Node::Array(_))) {
                warn!("'{}' is not an array; leaving it as is", full);
            }
        }
        (Segment::Field(name), false) => {
            if is_absent(fields.get(name)) {
                fields.insert(name.clone(), Node::object());
            }
            match fields.get_mut(name) {
                Some(Node::Object(child)) => fill(child, rest, full),
                _ => warn!("'{}' crosses a non-object at '{}'", full, name),
            }
        }
        (Segment::ArrayField(name), false) => {
            let needs_fill = match fields.get(name) {
                Some(Node::Array(items)) => items.is_empty(),
                other => is_absent(other),
            };
            if needs_fill {
                fields.insert(name.clone(), Node::Array(vec![Node::object()]));
            }
            match fields.get_mut(name) {
                Some(Node::Array(items)) => {
                    for item in items.iter_mut() {
                        match item {
                            Node::Object(child) => fill(child, rest, full),
                            other => warn!(
                                "'{}' expects objects in '{}', found {}",
                                full,
                                name,
                                other.kind()
                            ),
                        }
                    }
                }
                _ => warn!("'{}' crosses a non-array at '{}'", full, name),
            }
        }
    }
}
