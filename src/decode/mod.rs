//! Grid → tree decoder
//!
//! Rebuilds nested records from a sheet whose header row holds dotted paths.
//! A non-blank first column starts a new record; following rows with a blank
//! first column continue it, adding elements to its repeating groups.

pub mod arena;
pub mod navigator;
pub mod placeholders;

use crate::error::{TranscodeError, TranscodeResult};
use crate::grid::{is_blank, Cell, Grid};
use crate::normalize;
use crate::path::Path;
use crate::tree::Node;
use arena::{Arena, NodeId, Slot};
use navigator::{Key, Navigator, Step};
use tracing::{debug, error, info, warn};

/// A cell that could not be placed; the rest of the sheet still decodes
#[derive(Debug)]
pub struct CellError {
    /// Sheet row, header row being 0
    pub row: usize,
    pub column: usize,
    pub header: String,
    pub error: TranscodeError,
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} column {} ('{}'): {}",
            self.row, self.column, self.header, self.error
        )
    }
}

/// Records decoded from one sheet plus the cells that were skipped
#[derive(Debug)]
pub struct SheetDecode {
    pub name: String,
    pub records: Vec<Node>,
    pub errors: Vec<CellError>,
}

enum Column {
    Ignored,
    Invalid { header: String, reason: String },
    Valid { path: Path, key: Key },
}

impl Column {
    fn from_header(header: &str) -> Self {
        let header = header.trim();
        if header.is_empty() {
            return Column::Ignored;
        }
        match Path::parse(header) {
            Ok(path) => Column::Valid {
                key: navigator::expand(&path),
                path,
            },
            Err(TranscodeError::PathSyntax { reason, .. }) => Column::Invalid {
                header: header.to_string(),
                reason,
            },
            Err(other) => Column::Invalid {
                header: header.to_string(),
                reason: other.to_string(),
            },
        }
    }

    fn path(&self) -> Option<&Path> {
        match self {
            Column::Valid { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Decoder for a single sheet
pub struct SheetDecoder<'a> {
    trace_id: &'a str,
}

impl<'a> SheetDecoder<'a> {
    pub fn new(trace_id: &'a str) -> Self {
        Self { trace_id }
    }

    /// Decode every data row of `grid` into records. Placeholders and the
    /// containers that only held them are pruned from the result.
    pub fn decode(&self, name: &str, grid: &Grid) -> SheetDecode {
        info!("decoding sheet name={} rows={}", name, grid.height());

        let columns: Vec<Column> = grid.headers.iter().map(|h| Column::from_header(h)).collect();
        let paths: Vec<Option<&Path>> = columns.iter().map(Column::path).collect();

        let mut arena = Arena::new();
        let mut navigator = Navigator::new();
        let mut records: Vec<NodeId> = Vec::new();
        let mut errors = Vec::new();

        for (row_idx, source) in grid.rows.iter().enumerate() {
            let mut row = source.clone();
            placeholders::insert_placeholders(&paths, &mut row);

            if !is_blank(row.first().and_then(Option::as_ref)) {
                let root = arena.new_object();
                records.push(root);
                navigator.start_record(root);
            }

            for (col, column) in columns.iter().enumerate() {
                let Some(cell) = row.get(col).and_then(Option::as_ref) else {
                    continue;
                };
                if cell.is_blank() {
                    continue;
                }

                let result = match column {
                    Column::Ignored => continue,
                    Column::Invalid { header, reason } => Err(TranscodeError::PathSyntax {
                        path: header.clone(),
                        reason: reason.clone(),
                    }),
                    Column::Valid { key, .. } => {
                        if !navigator.is_open() {
                            warn!(
                                "row={} has no record start; opening a new record trace_id={}",
                                row_idx + 1,
                                self.trace_id
                            );
                            let root = arena.new_object();
                            records.push(root);
                            navigator.start_record(root);
                        }
                        write_cell(&mut arena, &mut navigator, key, cell)
                    }
                };

                if let Err(err) = result {
                    error!(
                        "error processing cell trace_id={} row={} col={}: {}",
                        self.trace_id,
                        row_idx + 1,
                        col,
                        err
                    );
                    errors.push(CellError {
                        row: row_idx + 1,
                        column: col,
                        header: grid.headers[col].clone(),
                        error: err,
                    });
                }
            }
        }

        let raw: Vec<Node> = records.iter().map(|id| arena.to_node(*id)).collect();
        SheetDecode {
            name: name.to_string(),
            records: normalize::prune_records(raw),
            errors,
        }
    }
}

/// Navigate to the cell's parent and store its value there
fn write_cell(
    arena: &mut Arena,
    nav: &mut Navigator,
    key: &[Step],
    cell: &Cell,
) -> TranscodeResult<()> {
    let parent = nav.navigate(arena, key)?;
    let value = arena.alloc(Slot::Scalar(cell.to_scalar()));
    debug!("cell_value={:?} depth={}", cell, nav.depth());

    let found = arena.get(parent).kind();
    match (key.last(), arena.get_mut(parent)) {
        (Some(Step::Field(name)), Slot::Object(map)) => {
            map.insert(name.clone(), value);
            Ok(())
        }
        (Some(Step::Array(_)), Slot::Array(items)) => {
            items.push(value);
            Ok(())
        }
        (Some(Step::Array(_)), _) => Err(TranscodeError::StructuralConflict {
            path: navigator::display_key(key),
            expected: "array",
            found,
        }),
        _ => Err(TranscodeError::StructuralConflict {
            path: navigator::display_key(key),
            expected: "object",
            found,
        }),
    }
}

/// Decode one sheet with the given correlation id
pub fn decode_sheet(name: &str, grid: &Grid, trace_id: &str) -> SheetDecode {
    SheetDecoder::new(trace_id).decode(name, grid)
}
