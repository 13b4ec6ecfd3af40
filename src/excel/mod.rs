//! Excel workbook I/O
//!
//! - Export: encoded sheets → .xlsx (bold headers, column fills, autofit)
//! - Import: .xlsx → one grid per worksheet

mod exporter;
mod importer;

pub use exporter::{parse_color, ExcelExporter};
pub use importer::ExcelImporter;
