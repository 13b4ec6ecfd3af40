//! API request handlers

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::cli::{decode_file, encode_file};
use crate::config::TranscodeConfig;

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "gridtree API Server".to_string(),
        version: state.version.clone(),
        description: "Spreadsheet ⇄ JSON transcoding over HTTP".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/api/v1/decode", "POST", "Decode an Excel workbook into a document"),
            EndpointInfo::new("/api/v1/encode", "POST", "Encode a document into an Excel workbook"),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["decode".to_string(), "encode".to_string()],
    }))
}

/// Decode request
#[derive(Deserialize)]
pub struct DecodeRequest {
    pub excel_path: String,
    #[serde(default)]
    pub all_sheets: bool,
    #[serde(default)]
    pub document_type: Option<String>,
}

/// Decode response: the document plus everything that was skipped
#[derive(Serialize, Default)]
pub struct DecodeResponse {
    pub document: Value,
    pub cell_errors: Vec<String>,
    pub unresolved: Vec<String>,
}

/// POST /api/v1/decode - Excel workbook → document
pub async fn decode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DecodeRequest>,
) -> impl IntoResponse {
    let mut config = TranscodeConfig::default().with_document_type(state.document_type.clone());
    if let Some(document_type) = req.document_type {
        config = config.with_document_type(document_type);
    }

    match decode_file(&PathBuf::from(&req.excel_path), &config, req.all_sheets) {
        Ok(decoded) => Json(ApiResponse::ok(DecodeResponse {
            document: decoded.document,
            cell_errors: decoded.errors.iter().map(ToString::to_string).collect(),
            unresolved: decoded.unresolved.iter().map(ToString::to_string).collect(),
        })),
        Err(e) => {
            warn!("decode of '{}' failed: {}", req.excel_path, e);
            Json(ApiResponse::err(e.to_string()))
        }
    }
}

/// Encode request
#[derive(Deserialize)]
pub struct EncodeRequest {
    pub document: Value,
    pub excel_path: String,
}

/// Encode response
#[derive(Serialize, Default)]
pub struct EncodeResponse {
    pub encoded: bool,
    pub excel_path: String,
    pub sheets: usize,
    pub message: String,
}

/// POST /api/v1/encode - Document → Excel workbook
pub async fn encode(Json(req): Json<EncodeRequest>) -> impl IntoResponse {
    let config = TranscodeConfig::default();
    match encode_file(&req.document, &PathBuf::from(&req.excel_path), &config) {
        Ok(sheets) => Json(ApiResponse::ok(EncodeResponse {
            encoded: true,
            excel_path: req.excel_path,
            sheets,
            message: "Encode completed".to_string(),
        })),
        Err(e) => {
            warn!("encode to '{}' failed: {}", req.excel_path, e);
            Json(ApiResponse::err(e.to_string()))
        }
    }
}
