use thiserror::Error;

pub type TranscodeResult<T> = Result<T, TranscodeError>;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Invalid path '{path}': {reason}")]
    PathSyntax { path: String, reason: String },

    #[error("Structural conflict at '{path}': expected {expected}, found {found}")]
    StructuralConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unresolved reference from sheet '{sheet}': {key} = {value}")]
    UnresolvedReference {
        sheet: String,
        key: String,
        value: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Document error: {0}")]
    Document(String),
}
