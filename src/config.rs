//! Transcoder settings shared by the CLI, the API server and the library entry points

use uuid::Uuid;

pub const DEFAULT_DOCUMENT_TYPE: &str = "template-load";
pub const DEFAULT_PRIMARY_KEY: &str = "data";
pub const DEFAULT_IDENTIFIER_FIELD: &str = "identifier";
pub const DEFAULT_REFERENCE_SUFFIX: &str = "_identifier";

/// Knobs for one transcode call
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeConfig {
    /// Value of the top-level `document_type` field on decode
    pub document_type: String,
    /// Key holding the primary sheet's records on decode
    pub primary_key: String,
    /// Field a parent record is matched on by the reference resolver
    pub identifier_field: String,
    /// Suffix marking a child field as a reference to `<sheet><suffix>`
    pub reference_suffix: String,
    /// Correlation id attached to per-cell error logs
    pub trace_id: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
            reference_suffix: DEFAULT_REFERENCE_SUFFIX.to_string(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }
}

impl TranscodeConfig {
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn with_identifier_field(mut self, identifier_field: impl Into<String>) -> Self {
        self.identifier_field = identifier_field.into();
        self
    }

    pub fn with_reference_suffix(mut self, reference_suffix: impl Into<String>) -> Self {
        self.reference_suffix = reference_suffix.into();
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Sheet name referenced by `field`, if it follows the `<sheet>_identifier` convention
    pub fn referenced_sheet<'a>(&self, field: &'a str) -> Option<&'a str> {
        field
            .strip_suffix(self.reference_suffix.as_str())
            .filter(|sheet| !sheet.is_empty())
    }

    /// True for a root-level leaf that should lead the derived header row
    pub fn is_identity_field(&self, field: &str) -> bool {
        field.ends_with(self.identifier_field.as_str())
    }
}
