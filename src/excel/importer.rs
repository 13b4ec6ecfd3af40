//! Excel importer: .xlsx → grids, one per worksheet in workbook order

use crate::error::{TranscodeError, TranscodeResult};
use crate::grid::{Cell, Grid};
use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use chrono::{Duration, NaiveDate, SecondsFormat};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Excel importer producing one `(sheet name, grid)` pair per worksheet
pub struct ExcelImporter {
    path: std::path::PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read every worksheet of the file
    pub fn import(&self) -> TranscodeResult<Vec<(String, Grid)>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| TranscodeError::Excel(format!("Failed to open Excel file: {}", e)))?;
        read_sheets(&mut workbook)
    }

    /// Read every worksheet of an in-memory workbook
    pub fn import_bytes(bytes: &[u8]) -> TranscodeResult<Vec<(String, Grid)>> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| TranscodeError::Excel(format!("Failed to read Excel data: {}", e)))?;
        read_sheets(&mut workbook)
    }
}

fn read_sheets<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> TranscodeResult<Vec<(String, Grid)>> {
    let names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| TranscodeError::Excel(format!("Failed to read sheet '{}': {}", name, e)))?;
        let grid = range_to_grid(&range);
        debug!("read sheet '{}' ({} data rows)", name, grid.height());
        sheets.push((name, grid));
    }
    Ok(sheets)
}

/// Row 0 of the sheet is the header row. Coordinates are absolute so leading
/// blank rows and columns keep their place.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((last_row, last_col)) = range.end() else {
        return Grid::default();
    };

    let width = last_col as usize + 1;
    let headers = (0..width)
        .map(|col| header_text(range.get_value((0, col as u32))))
        .collect();

    let rows = (1..=last_row)
        .map(|row| {
            (0..width)
                .map(|col| range.get_value((row, col as u32)).and_then(to_cell))
                .collect()
        })
        .collect();

    Grid::with_rows(headers, rows)
}

fn header_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => f.to_string(),
        _ => String::new(),
    }
}

fn to_cell(data: &Data) -> Option<Cell> {
    match data {
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Bool(b) => Some(Cell::Bool(*b)),
        Data::DateTime(_) => data.as_f64().and_then(excel_serial_to_iso).map(Cell::Text),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Excel date serial (days since 1899-12-30) as a UTC instant, e.g.
/// `2024-01-01T00:00:00Z`; fractional seconds only when present
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let stamp = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(stamp.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
