//! Workbook-level entry points
//!
//! Decode: sheet 0 carries request metadata (one header row, one value row),
//! every later sheet decodes to an array of records, references are resolved
//! once all sheets are done, and sheet 1 becomes the primary array.
//!
//! Encode: the document maps sheet names to `{data, headers?,
//! header_rename_map?, cell_style_map?}`.

use crate::config::TranscodeConfig;
use crate::decode::{self, CellError};
use crate::encode::SheetEncoder;
use crate::error::{TranscodeError, TranscodeResult};
use crate::grid::{is_blank, Grid, StyleHints};
use crate::resolve;
use crate::tree::Node;
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

pub const DATA: &str = "data";
pub const HEADERS: &str = "headers";
pub const HEADER_RENAME_MAP: &str = "header_rename_map";
pub const CELL_STYLE_MAP: &str = "cell_style_map";
pub const DEFAULT_CELL_STYLE: &str = "default_cell_style";
pub const REQUEST: &str = "request";
pub const GUID: &str = "guid";
pub const DOCUMENT_TYPE: &str = "document_type";

/// All data sheets after decoding and joining
#[derive(Debug)]
pub struct DecodedSheets {
    pub sheets: IndexMap<String, Vec<Node>>,
    pub errors: Vec<CellError>,
    pub unresolved: Vec<TranscodeError>,
}

/// A decoded workbook ready to hand back to a caller
#[derive(Debug)]
pub struct DecodedDocument {
    pub document: Value,
    pub errors: Vec<CellError>,
    pub unresolved: Vec<TranscodeError>,
}

/// Decode every given sheet as data, then resolve references across them
pub fn decode_sheets(sheets: &[(String, Grid)], config: &TranscodeConfig) -> DecodedSheets {
    let mut decoded = IndexMap::new();
    let mut errors = Vec::new();
    for (name, grid) in sheets {
        let sheet = decode::decode_sheet(name, grid, &config.trace_id);
        errors.extend(sheet.errors);
        decoded.insert(sheet.name, sheet.records);
    }

    let resolution = resolve::resolve_references(decoded, config);
    DecodedSheets {
        sheets: resolution.sheets,
        errors,
        unresolved: resolution.unresolved,
    }
}

/// Decode a whole workbook into the request document
pub fn decode_workbook(
    sheets: &[(String, Grid)],
    config: &TranscodeConfig,
    include_all_sheets: bool,
) -> TranscodeResult<DecodedDocument> {
    let Some(((_, meta), data_sheets)) = sheets.split_first() else {
        return Err(TranscodeError::Document("workbook has no sheets".to_string()));
    };
    info!(
        "decoding workbook sheets={} trace_id={}",
        sheets.len(),
        config.trace_id
    );

    let decoded = decode_sheets(data_sheets, config);
    let primary = data_sheets
        .first()
        .and_then(|(name, _)| decoded.sheets.get(name))
        .map(|records| records_to_json(records))
        .unwrap_or_else(|| Value::Array(Vec::new()));

    let request_id = Uuid::new_v4().to_string();
    let mut document = Map::new();
    document.insert(config.primary_key.clone(), primary);
    if include_all_sheets {
        for (name, records) in &decoded.sheets {
            if !document.contains_key(name) {
                document.insert(name.clone(), records_to_json(records));
            }
        }
    }
    document.insert(REQUEST.to_string(), request_metadata(meta, &request_id));
    document.insert(GUID.to_string(), Value::String(request_id));
    document.insert(
        DOCUMENT_TYPE.to_string(),
        Value::String(config.document_type.clone()),
    );

    Ok(DecodedDocument {
        document: Value::Object(document),
        errors: decoded.errors,
        unresolved: decoded.unresolved,
    })
}

fn records_to_json(records: &[Node]) -> Value {
    Value::Array(records.iter().map(Value::from).collect())
}

/// `request` object: fresh id, current timestamp, then every non-blank
/// scalar of the metadata sheet's first value row keyed by its header.
fn request_metadata(meta: &Grid, request_id: &str) -> Value {
    let mut request = Map::new();
    request.insert("request_id".to_string(), Value::String(request_id.to_string()));
    request.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    for (col, header) in meta.headers.iter().enumerate() {
        let header = header.trim();
        let cell = meta.get(0, col);
        if header.is_empty() || is_blank(cell) {
            continue;
        }
        if let Some(cell) = cell {
            request.insert(header.to_string(), Value::from(Node::Scalar(cell.to_scalar())));
        }
    }
    Value::Object(request)
}

/// Encode input for one sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetSpec {
    pub data: Vec<Value>,
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    #[serde(default)]
    pub header_rename_map: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub cell_style_map: Option<IndexMap<String, String>>,
}

/// One encoded sheet, ready for the workbook writer
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSheet {
    pub name: String,
    pub grid: Grid,
    pub style: StyleHints,
}

/// Encode a single sheet spec
pub fn encode_sheet_spec(name: &str, spec: &SheetSpec, config: &TranscodeConfig) -> EncodedSheet {
    info!("translating sheet name={}", name);
    let records: Vec<Node> = spec.data.iter().map(Node::from).collect();
    let encoder = SheetEncoder::new(config);
    let headers = encoder.headers(&records, spec.headers.as_deref());

    let style = match &spec.cell_style_map {
        Some(map) => StyleHints::from_style_map(&headers, map, DEFAULT_CELL_STYLE),
        None => StyleHints::default(),
    };

    let mut grid = encoder.encode(&records, headers);
    if let Some(renames) = &spec.header_rename_map {
        for header in grid.headers.iter_mut() {
            if let Some(renamed) = renames.get(header.as_str()) {
                *header = renamed.clone();
            }
        }
    }

    EncodedSheet {
        name: name.to_string(),
        grid,
        style,
    }
}

/// Encode every sheet of a document, in document order
pub fn encode_workbook(
    document: &Value,
    config: &TranscodeConfig,
) -> TranscodeResult<Vec<EncodedSheet>> {
    let sheets = document.as_object().ok_or_else(|| {
        TranscodeError::Document("document must be an object of sheets".to_string())
    })?;

    sheets
        .iter()
        .map(|(name, value)| {
            let spec: SheetSpec = serde_json::from_value(value.clone()).map_err(|e| {
                TranscodeError::Document(format!(
                    "sheet '{}' is not a valid sheet entry: {}",
                    name, e
                ))
            })?;
            Ok(encode_sheet_spec(name, &spec, config))
        })
        .collect()
}
