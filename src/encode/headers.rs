//! Header derivation from record trees

use crate::config::TranscodeConfig;
use crate::path::{Path, Segment};
use crate::tree::Node;
use indexmap::IndexMap;
use tracing::warn;

/// Ordered, de-duplicated header list. Identity columns come first, then
/// single-valued columns, then columns under a repeating group, so the first
/// column is never a repeating one while any record has a plain leaf.
#[derive(Debug, Default)]
struct HeaderSet {
    paths: Vec<Path>,
    identity_count: usize,
    single_count: usize,
}

impl HeaderSet {
    fn push(&mut self, path: Path) {
        if self.paths.contains(&path) {
            return;
        }
        if path.contains_array() {
            self.paths.push(path);
        } else {
            self.paths.insert(self.identity_count + self.single_count, path);
            self.single_count += 1;
        }
    }

    fn push_identity(&mut self, path: Path) {
        if !self.paths.contains(&path) {
            self.paths.insert(self.identity_count, path);
            self.identity_count += 1;
        }
    }
}

/// Depth-first walk of every record collecting leaf paths in first-seen order.
/// Root-level leaves ending in the identifier field name lead the list and
/// repeating-group columns trail it.
pub fn derive_headers(records: &[Node], config: &TranscodeConfig) -> Vec<Path> {
    let mut headers = HeaderSet::default();
    for record in records {
        match record {
            Node::Object(fields) => collect(fields, &Path::root(), config, &mut headers),
            other => warn!("skipping non-object record of kind {}", other.kind()),
        }
    }
    headers.paths
}

fn collect(
    fields: &IndexMap<String, Node>,
    prefix: &Path,
    config: &TranscodeConfig,
    headers: &mut HeaderSet,
) {
    for (name, value) in fields {
        match value {
            Node::Object(child) => {
                collect(child, &prefix.child(Segment::Field(name.clone())), config, headers)
            }
            Node::Array(items) => {
                let path = prefix.child(Segment::ArrayField(name.clone()));
                for item in items {
                    match item {
                        Node::Object(child) => collect(child, &path, config, headers),
                        Node::Scalar(_) => headers.push(path.clone()),
                        Node::Array(_) => warn!("nested array under '{}' has no header form", path),
                    }
                }
            }
            Node::Scalar(_) => {
                let path = prefix.child(Segment::Field(name.clone()));
                if prefix.is_empty() && config.is_identity_field(name) {
                    headers.push_identity(path);
                } else {
                    headers.push(path);
                }
            }
        }
    }
}
