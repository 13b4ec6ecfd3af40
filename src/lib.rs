//! gridtree - spreadsheet grids with dotted path headers ⇄ nested JSON
//!
//! A header like `items[].sku` addresses the `sku` field of each element of
//! the `items` array. Decoding walks the rows with a navigation stack over an
//! arena of nodes; encoding derives headers, pads every record so each header
//! resolves, then lays records out row by row.
//!
//! # Features
//!
//! - Path grammar with `[]` repeating-group markers
//! - Grid → tree decoder with per-cell error reporting
//! - Tree → grid encoder with derived or explicit headers
//! - Cross-sheet `<sheet>_identifier` reference resolution
//! - Excel import/export, CLI and HTTP API
//!
//! # Example
//!
//! ```
//! use gridtree::{decode_sheet, encode_sheet, Node, TranscodeConfig};
//! use serde_json::json;
//!
//! let config = TranscodeConfig::default();
//! let record = Node::from(json!({"id": "A", "items": [{"sku": "x"}, {"sku": "y"}]}));
//! let grid = encode_sheet(&[record.clone()], None, &config);
//! assert_eq!(grid.headers, vec!["id", "items[].sku"]);
//!
//! let decoded = decode_sheet("order", &grid, &config.trace_id);
//! assert_eq!(decoded.records, vec![record]);
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod excel;
pub mod grid;
pub mod normalize;
pub mod path;
pub mod resolve;
pub mod tree;

// Re-export commonly used types
pub use config::TranscodeConfig;
pub use decode::{decode_sheet, CellError, SheetDecode};
pub use document::{decode_sheets, decode_workbook, encode_workbook, DecodedDocument, EncodedSheet};
pub use encode::{derive_headers, encode_sheet};
pub use error::{TranscodeError, TranscodeResult};
pub use grid::{Cell, Grid, StyleHints};
pub use path::{Path, Segment};
pub use resolve::resolve_references;
pub use tree::{Node, Scalar};
