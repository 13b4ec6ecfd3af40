use crate::config::TranscodeConfig;
use crate::document::{self, DecodedDocument, SheetSpec};
use crate::encode::derive_headers;
use crate::error::{TranscodeError, TranscodeResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::tree::Node;
use clap::ValueEnum;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialization of a decoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn render(self, value: &Value) -> TranscodeResult<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Load a JSON or YAML document; `.yaml`/`.yml` select YAML, anything else JSON
pub fn load_document(path: &Path) -> TranscodeResult<Value> {
    let content = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Read a workbook and decode it into the request document
pub fn decode_file(
    input: &Path,
    config: &TranscodeConfig,
    all_sheets: bool,
) -> TranscodeResult<DecodedDocument> {
    let sheets = ExcelImporter::new(input).import()?;
    document::decode_workbook(&sheets, config, all_sheets)
}

/// Encode a document and write it as a workbook; returns the sheet count
pub fn encode_file(
    document: &Value,
    output: &Path,
    config: &TranscodeConfig,
) -> TranscodeResult<usize> {
    let sheets = document::encode_workbook(document, config)?;
    let count = sheets.len();
    ExcelExporter::new(sheets).export(output)?;
    Ok(count)
}

/// Execute the decode command
pub fn decode(
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    all_sheets: bool,
    config: TranscodeConfig,
    verbose: bool,
) -> TranscodeResult<()> {
    let decoded = decode_file(&input, &config, all_sheets)?;
    let rendered = format.render(&decoded.document)?;

    let Some(output) = output else {
        // stdout carries only the document so it can be piped
        report_problems(&decoded, verbose, true);
        println!("{}", rendered);
        return Ok(());
    };

    println!("{}", "📖 gridtree - Decode".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    fs::write(&output, rendered)?;
    report_problems(&decoded, verbose, false);

    let records = decoded.document[config.primary_key.as_str()]
        .as_array()
        .map_or(0, Vec::len);
    println!("{}", "✅ Decode Complete!".bold().green());
    println!("   {} records written to {}\n", records, output.display());
    Ok(())
}

fn report_problems(decoded: &DecodedDocument, verbose: bool, to_stderr: bool) {
    let mut lines = Vec::new();
    if !decoded.errors.is_empty() {
        lines.push(format!("⚠️  {} cells skipped", decoded.errors.len()).yellow().to_string());
        if verbose {
            lines.extend(decoded.errors.iter().map(|e| format!("   {}", e)));
        }
    }
    if !decoded.unresolved.is_empty() {
        lines.push(
            format!("⚠️  {} unresolved references", decoded.unresolved.len())
                .yellow()
                .to_string(),
        );
        if verbose {
            lines.extend(decoded.unresolved.iter().map(|e| format!("   {}", e)));
        }
    }
    for line in lines {
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Execute the encode command
pub fn encode(
    input: PathBuf,
    output: PathBuf,
    config: TranscodeConfig,
    verbose: bool,
) -> TranscodeResult<()> {
    println!("{}", "📊 gridtree - Encode".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading document...".cyan());
    }
    let document = load_document(&input)?;

    if verbose {
        println!("{}", "📊 Writing workbook...".cyan());
    }
    let count = encode_file(&document, &output, &config)?;

    println!("{}", "✅ Encode Complete!".bold().green());
    println!("   {} sheets written to {}\n", count, output.display());
    Ok(())
}

/// Execute the headers command: print the derived header row of every sheet
pub fn headers(input: PathBuf, config: TranscodeConfig) -> TranscodeResult<()> {
    let document = load_document(&input)?;
    let sheets = document.as_object().ok_or_else(|| {
        TranscodeError::Document("document must be an object of sheets".to_string())
    })?;

    for (name, value) in sheets {
        let spec: SheetSpec = serde_json::from_value(value.clone())
            .map_err(|e| TranscodeError::Document(format!("sheet '{}': {}", name, e)))?;
        let records: Vec<Node> = spec.data.iter().map(Node::from).collect();
        println!("{}", name.bold().bright_blue());
        for path in derive_headers(&records, &config) {
            println!("   {}", path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_document_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("doc.json");
        let yaml_path = dir.path().join("doc.YML");
        fs::write(&json_path, r#"{"s": {"data": [{"id": 1}]}}"#).unwrap();
        fs::write(&yaml_path, "s:\n  data:\n    - id: 1\n").unwrap();

        let expected = json!({"s": {"data": [{"id": 1}]}});
        assert_eq!(load_document(&json_path).unwrap(), expected);
        assert_eq!(load_document(&yaml_path).unwrap(), expected);
    }

    #[test]
    fn test_load_document_errors() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(matches!(load_document(&bad), Err(TranscodeError::Json(_))));
        assert!(matches!(
            load_document(&dir.path().join("missing.json")),
            Err(TranscodeError::Io(_))
        ));
    }

    #[test]
    fn test_output_format_render() {
        let value = json!({"a": [1, 2]});
        assert!(OutputFormat::Json.render(&value).unwrap().contains("\"a\""));
        assert!(OutputFormat::Yaml.render(&value).unwrap().starts_with("a:"));
    }

    #[test]
    fn test_encode_then_decode_file() {
        let dir = TempDir::new().unwrap();
        let book = dir.path().join("book.xlsx");
        let document = json!({
            "meta": {"data": [{"user": "u"}]},
            "order": {"data": [{"identifier": "A", "items": [{"sku": "x"}, {"sku": "y"}]}]}
        });
        let config = TranscodeConfig::default();
        assert_eq!(encode_file(&document, &book, &config).unwrap(), 2);

        let decoded = decode_file(&book, &config, false).unwrap();
        assert_eq!(
            decoded.document["data"],
            json!([{"identifier": "A", "items": [{"sku": "x"}, {"sku": "y"}]}])
        );
        assert_eq!(decoded.document["request"]["user"], json!("u"));
        assert!(decoded.errors.is_empty());
    }

    #[test]
    fn test_headers_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(headers(path, TranscodeConfig::default()).is_err());
    }
}
