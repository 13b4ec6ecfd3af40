//! Excel exporter: encoded sheets → .xlsx

use crate::document::EncodedSheet;
use crate::error::{TranscodeError, TranscodeResult};
use crate::grid::{Cell, StyleHints};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

/// Excel exporter for encoded sheets
pub struct ExcelExporter {
    sheets: Vec<EncodedSheet>,
}

impl ExcelExporter {
    pub fn new(sheets: Vec<EncodedSheet>) -> Self {
        Self { sheets }
    }

    /// Export to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> TranscodeResult<()> {
        let mut workbook = self.build()?;
        workbook
            .save(output_path)
            .map_err(|e| TranscodeError::Excel(format!("Failed to save Excel file: {}", e)))
    }

    /// Export to an in-memory .xlsx buffer
    pub fn export_to_buffer(&self) -> TranscodeResult<Vec<u8>> {
        let mut workbook = self.build()?;
        workbook
            .save_to_buffer()
            .map_err(|e| TranscodeError::Excel(format!("Failed to build Excel buffer: {}", e)))
    }

    fn build(&self) -> TranscodeResult<Workbook> {
        let mut workbook = Workbook::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name).map_err(|e| {
                TranscodeError::Excel(format!("Invalid sheet name '{}': {}", sheet.name, e))
            })?;
            Self::export_sheet(worksheet, sheet)?;
        }
        Ok(workbook)
    }

    fn export_sheet(worksheet: &mut Worksheet, sheet: &EncodedSheet) -> TranscodeResult<()> {
        let header_format = header_format(&sheet.style);
        for (col, header) in sheet.grid.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col_index(col)?, header, &header_format)
                .map_err(|e| TranscodeError::Excel(format!("Failed to write header: {}", e)))?;
        }

        let fills = column_formats(&sheet.style)?;
        for (row_idx, row) in sheet.grid.rows.iter().enumerate() {
            let row_num = row_index(row_idx + 1)?;
            for col in 0..sheet.grid.width() {
                let fill = fills.get(col).and_then(Option::as_ref);
                let cell = row.get(col).and_then(Option::as_ref);
                write_cell(worksheet, row_num, col_index(col)?, cell, fill)?;
            }
        }

        if sheet.style.autofit {
            worksheet.autofit();
        }
        debug!(
            "exported sheet '{}' ({} rows)",
            sheet.name,
            sheet.grid.height()
        );
        Ok(())
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: Option<&Cell>,
    fill: Option<&Format>,
) -> TranscodeResult<()> {
    let result = match (cell, fill) {
        (Some(Cell::Text(s)), Some(f)) => {
            worksheet.write_string_with_format(row, col, s, f).map(|_| ())
        }
        (Some(Cell::Text(s)), None) => worksheet.write_string(row, col, s).map(|_| ()),
        (Some(Cell::Number(n)), Some(f)) => {
            worksheet.write_number_with_format(row, col, *n, f).map(|_| ())
        }
        (Some(Cell::Number(n)), None) => worksheet.write_number(row, col, *n).map(|_| ()),
        (Some(Cell::Bool(b)), Some(f)) => {
            worksheet.write_boolean_with_format(row, col, *b, f).map(|_| ())
        }
        (Some(Cell::Bool(b)), None) => worksheet.write_boolean(row, col, *b).map(|_| ()),
        // Placeholders never reach the writer; treat a stray one as empty
        (None | Some(Cell::Placeholder), Some(f)) => worksheet.write_blank(row, col, f).map(|_| ()),
        (None | Some(Cell::Placeholder), None) => Ok(()),
    };
    result.map_err(|e| {
        TranscodeError::Excel(format!("Failed to write cell ({}, {}): {}", row, col, e))
    })
}

fn header_format(style: &StyleHints) -> Format {
    if style.bold_headers {
        Format::new().set_bold()
    } else {
        Format::new()
    }
}

fn column_formats(style: &StyleHints) -> TranscodeResult<Vec<Option<Format>>> {
    style
        .column_fills
        .iter()
        .map(|fill| {
            fill.as_deref()
                .map(|name| {
                    let color = parse_color(name)?;
                    Ok(Format::new()
                        .set_background_color(color)
                        .set_pattern(FormatPattern::Solid))
                })
                .transpose()
        })
        .collect()
}

/// Colour by `#RRGGBB` or by indexed-colour name (`LIGHT_GREEN`, `grey_25_percent`, ...)
pub fn parse_color(name: &str) -> TranscodeResult<Color> {
    let trimmed = name.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return u32::from_str_radix(hex, 16)
            .ok()
            .filter(|_| hex.len() == 6)
            .map(Color::RGB)
            .ok_or_else(|| TranscodeError::Excel(format!("Invalid colour '{}'", name)));
    }

    let rgb = match trimmed.to_ascii_uppercase().as_str() {
        "BLACK" => 0x000000,
        "WHITE" => 0xFFFFFF,
        "RED" => 0xFF0000,
        "BRIGHT_GREEN" => 0x00FF00,
        "BLUE" => 0x0000FF,
        "YELLOW" => 0xFFFF00,
        "PINK" => 0xFF00FF,
        "TURQUOISE" => 0x00FFFF,
        "DARK_RED" => 0x800000,
        "GREEN" => 0x008000,
        "DARK_BLUE" => 0x000080,
        "DARK_YELLOW" => 0x808000,
        "VIOLET" => 0x800080,
        "TEAL" => 0x008080,
        "GREY_25_PERCENT" => 0xC0C0C0,
        "GREY_40_PERCENT" => 0x969696,
        "GREY_50_PERCENT" => 0x808080,
        "GREY_80_PERCENT" => 0x333333,
        "CORNFLOWER_BLUE" => 0x9999FF,
        "LEMON_CHIFFON" => 0xFFFFCC,
        "LIGHT_TURQUOISE" => 0xCCFFFF,
        "LIGHT_GREEN" => 0xCCFFCC,
        "LIGHT_YELLOW" => 0xFFFF99,
        "PALE_BLUE" => 0x99CCFF,
        "ROSE" => 0xFF99CC,
        "LAVENDER" => 0xCC99FF,
        "TAN" => 0xFFCC99,
        "LIGHT_BLUE" => 0x3366FF,
        "AQUA" => 0x33CCCC,
        "LIME" => 0x99CC00,
        "GOLD" => 0xFFCC00,
        "LIGHT_ORANGE" => 0xFF9900,
        "ORANGE" => 0xFF6600,
        "SKY_BLUE" => 0x00CCFF,
        "SEA_GREEN" => 0x339966,
        "DARK_GREEN" => 0x003300,
        "OLIVE_GREEN" => 0x333300,
        "BROWN" => 0x993300,
        "PLUM" => 0x993366,
        "INDIGO" => 0x333399,
        "ROYAL_BLUE" => 0x0066CC,
        "LIGHT_CORNFLOWER_BLUE" => 0xCCCCFF,
        "MAROON" => 0x7F0000,
        "CORAL" => 0xFF8080,
        _ => return Err(TranscodeError::Excel(format!("Unknown colour '{}'", name))),
    };
    Ok(Color::RGB(rgb))
}

fn row_index(row: usize) -> TranscodeResult<u32> {
    u32::try_from(row).map_err(|_| TranscodeError::Excel(format!("Row {} out of range", row)))
}

fn col_index(col: usize) -> TranscodeResult<u16> {
    u16::try_from(col).map_err(|_| TranscodeError::Excel(format!("Column {} out of range", col)))
}
