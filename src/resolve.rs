//! Cross-sheet reference resolver
//!
//! A record holding `<sheet>_identifier = v` is copied into the first record of
//! `<sheet>` whose `identifier` equals `v`, under an array named after the
//! child's own sheet. Children stay in their own sheet as well. Joins compose:
//! a child carries its own joined children into its parent.

use crate::config::TranscodeConfig;
use crate::error::TranscodeError;
use crate::tree::Node;
use indexmap::IndexMap;
use tracing::{debug, warn};

type RecordRef = (usize, usize);

/// Sheets after joining, plus the references that matched nothing
#[derive(Debug)]
pub struct Resolution {
    pub sheets: IndexMap<String, Vec<Node>>,
    pub unresolved: Vec<TranscodeError>,
}

/// Join child records into their parents. Must run after every sheet of the
/// document has been decoded.
pub fn resolve_references(
    sheets: IndexMap<String, Vec<Node>>,
    config: &TranscodeConfig,
) -> Resolution {
    let mut unresolved = Vec::new();
    let links = find_links(&sheets, config, &mut unresolved);

    let resolver = Resolver {
        sheets: &sheets,
        links: &links,
    };
    let resolved = sheets
        .iter()
        .enumerate()
        .map(|(sheet_idx, (name, records))| {
            let joined = (0..records.len())
                .map(|idx| resolver.build((sheet_idx, idx), &mut Vec::new()))
                .collect();
            (name.clone(), joined)
        })
        .collect();

    Resolution {
        sheets: resolved,
        unresolved,
    }
}

/// parent → children, in discovery order
fn find_links(
    sheets: &IndexMap<String, Vec<Node>>,
    config: &TranscodeConfig,
    unresolved: &mut Vec<TranscodeError>,
) -> IndexMap<RecordRef, Vec<RecordRef>> {
    let mut links: IndexMap<RecordRef, Vec<RecordRef>> = IndexMap::new();

    for (child_sheet, (sheet_name, records)) in sheets.iter().enumerate() {
        for (child_idx, record) in records.iter().enumerate() {
            let Some(fields) = record.as_object() else {
                continue;
            };
            for (field, value) in fields {
                let Some(parent_name) = config.referenced_sheet(field) else {
                    continue;
                };
                let Some(wanted) = value.as_scalar().and_then(|s| s.as_key()) else {
                    continue;
                };

                let parent = sheets.get_full(parent_name).and_then(|(parent_sheet, _, parents)| {
                    parents
                        .iter()
                        .position(|candidate| {
                            candidate
                                .get(&config.identifier_field)
                                .and_then(Node::as_scalar)
                                .and_then(|s| s.as_key())
                                .is_some_and(|id| id == wanted)
                        })
                        .map(|parent_idx| (parent_sheet, parent_idx))
                });

                match parent {
                    Some(parent) => {
                        debug!(
                            "linking {}[{}] into {}[{}]",
                            sheet_name, child_idx, parent_name, parent.1
                        );
                        links.entry(parent).or_default().push((child_sheet, child_idx));
                    }
                    None => {
                        let err = TranscodeError::UnresolvedReference {
                            sheet: sheet_name.clone(),
                            key: field.clone(),
                            value: wanted,
                        };
                        warn!("{}", err);
                        unresolved.push(err);
                    }
                }
            }
        }
    }
    links
}

struct Resolver<'a> {
    sheets: &'a IndexMap<String, Vec<Node>>,
    links: &'a IndexMap<RecordRef, Vec<RecordRef>>,
}

impl Resolver<'_> {
    fn record(&self, (sheet, idx): RecordRef) -> Option<(&String, &Node)> {
        self.sheets
            .get_index(sheet)
            .and_then(|(name, records)| records.get(idx).map(|record| (name, record)))
    }

    /// Copy a record and attach its linked children, recursively
    fn build(&self, at: RecordRef, path: &mut Vec<RecordRef>) -> Node {
        let Some((_, record)) = self.record(at) else {
            return Node::object();
        };
        let mut node = record.clone();
        let Some(children) = self.links.get(&at) else {
            return node;
        };

        path.push(at);
        for &child in children {
            if path.contains(&child) {
                warn!("skipping cyclic reference between sheets");
                continue;
            }
            let Some((child_sheet, _)) = self.record(child) else {
                continue;
            };
            let child_sheet = child_sheet.clone();
            let built = self.build(child, path);

            let Some(fields) = node.as_object_mut() else {
                continue;
            };
            match fields
                .entry(child_sheet.clone())
                .or_insert_with(|| Node::Array(Vec::new()))
            {
                Node::Array(items) => items.push(built),
                other => warn!(
                    "{}",
                    TranscodeError::StructuralConflict {
                        path: child_sheet,
                        expected: "array",
                        found: other.kind(),
                    }
                ),
            }
        }
        path.pop();
        node
    }
}
