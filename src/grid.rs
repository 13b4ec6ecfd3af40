//! Rectangular sheet model: one header row of path strings plus data rows

use crate::tree::Scalar;
use indexmap::IndexMap;

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Reserved sentinel; encoder and decoder strip it before returning
    Placeholder,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Placeholder)
    }

    /// Empty text counts as blank, like an untouched cell
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    pub fn to_scalar(&self) -> Scalar {
        match self {
            Cell::Bool(b) => Scalar::Bool(*b),
            Cell::Number(n) => Scalar::Number(*n),
            Cell::Text(s) => Scalar::Text(s.clone()),
            Cell::Placeholder => Scalar::Placeholder,
        }
    }

    /// Null has no cell form; it occupies the slot as a placeholder
    pub fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => Cell::Bool(*b),
            Scalar::Number(n) => Cell::Number(*n),
            Scalar::Text(s) => Cell::Text(s.clone()),
            Scalar::Null | Scalar::Placeholder => Cell::Placeholder,
        }
    }
}

/// True for a missing cell or one holding empty text
pub fn is_blank(cell: Option<&Cell>) -> bool {
    cell.map_or(true, Cell::is_blank)
}

/// Header row plus column-aligned data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Cell>>>,
}

impl Grid {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a grid from string headers and rows of optional cells
    pub fn with_rows(headers: Vec<String>, rows: Vec<Vec<Option<Cell>>>) -> Self {
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(Option::as_ref)
    }

    /// Grow the grid so `row` exists, padding every row to the header width
    pub fn ensure_row(&mut self, row: usize) {
        let width = self.width();
        while self.rows.len() <= row {
            self.rows.push(vec![None; width]);
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.ensure_row(row);
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        cells[col] = Some(cell);
    }

    pub fn is_blank(&self, row: usize, col: usize) -> bool {
        is_blank(self.get(row, col))
    }

    /// True if any cell still holds the placeholder sentinel
    pub fn has_placeholders(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .any(|cell| cell.as_ref().is_some_and(Cell::is_placeholder))
    }
}

/// Presentation directives passed through to the workbook writer untouched
#[derive(Debug, Clone, PartialEq)]
pub struct StyleHints {
    pub bold_headers: bool,
    pub autofit: bool,
    /// Colour name per column, applied to data rows only
    pub column_fills: Vec<Option<String>>,
}

impl Default for StyleHints {
    fn default() -> Self {
        Self {
            bold_headers: true,
            autofit: true,
            column_fills: Vec::new(),
        }
    }
}

impl StyleHints {
    /// Resolve a `cell_style_map` against header paths. Keys match the first
    /// path segment (marker included); `default_key` covers the rest.
    pub fn from_style_map(
        headers: &[String],
        style_map: &IndexMap<String, String>,
        default_key: &str,
    ) -> Self {
        let column_fills = headers
            .iter()
            .map(|header| {
                let first = header.split('.').next().unwrap_or_default();
                style_map
                    .get(first)
                    .or_else(|| style_map.get(default_key))
                    .cloned()
            })
            .collect();
        Self {
            column_fills,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_grows_grid() {
        let mut grid = Grid::new(vec!["a".into(), "b".into()]);
        grid.set(2, 1, Cell::text("x"));
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(2, 1), Some(&Cell::text("x")));
        assert!(grid.is_blank(0, 0));
        assert!(grid.is_blank(5, 5));
    }

    #[test]
    fn test_empty_text_is_blank() {
        let mut grid = Grid::new(vec!["a".into()]);
        grid.set(0, 0, Cell::text(""));
        assert!(grid.is_blank(0, 0));
    }

    #[test]
    fn test_style_hints_from_map() {
        let headers = vec!["id".to_string(), "addr.city".into(), "items[].sku".into()];
        let mut map = IndexMap::new();
        map.insert("addr".to_string(), "LIGHT_GREEN".to_string());
        map.insert("default_cell_style".to_string(), "WHITE".to_string());
        let hints = StyleHints::from_style_map(&headers, &map, "default_cell_style");
        assert_eq!(
            hints.column_fills,
            vec![
                Some("WHITE".to_string()),
                Some("LIGHT_GREEN".to_string()),
                Some("WHITE".to_string())
            ]
        );
        assert!(hints.bold_headers);
    }
}
