//! Tree → grid encoder
//!
//! Headers come from the caller or are derived from the records. Every record
//! is first padded so each header path resolves, then laid out row by row.
//! Placeholders left in the grid are cleared at the end.

pub mod broadcast;
pub mod headers;
pub mod layout;

use crate::config::TranscodeConfig;
use crate::grid::Grid;
use crate::normalize;
use crate::path::Path;
use crate::tree::Node;
use layout::Layout;
use tracing::{info, warn};

pub use headers::derive_headers;

/// Encoder for a single sheet
pub struct SheetEncoder<'a> {
    config: &'a TranscodeConfig,
}

impl<'a> SheetEncoder<'a> {
    pub fn new(config: &'a TranscodeConfig) -> Self {
        Self { config }
    }

    /// Header strings for `records`: the explicit list when non-empty,
    /// otherwise the derived one
    pub fn headers(&self, records: &[Node], explicit: Option<&[String]>) -> Vec<String> {
        match explicit {
            Some(headers) if !headers.is_empty() => headers.to_vec(),
            _ => derive_headers(records, self.config)
                .iter()
                .map(Path::to_string)
                .collect(),
        }
    }

    /// Lay `records` out under `headers`
    pub fn encode(&self, records: &[Node], headers: Vec<String>) -> Grid {
        let columns: Vec<Option<Path>> = headers
            .iter()
            .map(|header| match Path::parse(header) {
                Ok(path) if !path.is_empty() => Some(path),
                Ok(_) => None,
                Err(err) => {
                    warn!("header column left empty: {}", err);
                    None
                }
            })
            .collect();

        let mut records = records.to_vec();
        let paths: Vec<&Path> = columns.iter().flatten().collect();
        broadcast::broadcast_all(&mut records, &paths);

        let mut grid = Grid::new(headers);
        let mut layout = Layout::new(&mut grid, &columns);
        for record in &records {
            layout.emit_record(record);
        }

        normalize::clear_placeholders(&mut grid);
        info!(
            "encoded {} records into {} rows x {} columns",
            records.len(),
            grid.height(),
            grid.width()
        );
        grid
    }
}

/// Encode records with explicit or derived headers
pub fn encode_sheet(
    records: &[Node],
    headers: Option<&[String]>,
    config: &TranscodeConfig,
) -> Grid {
    let encoder = SheetEncoder::new(config);
    let headers = encoder.headers(records, headers);
    encoder.encode(records, headers)
}
