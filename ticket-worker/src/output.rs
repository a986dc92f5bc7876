//! Output formatting for the ticket worker.
//!
//! Every response is a single compact JSON object on stdout.

use std::collections::BTreeMap;

use serde::Serialize;
use ticket_code::{CodeComponents, CodeError, TicketRecord};

/// Response for generate operations.
#[derive(Serialize)]
pub struct GenerateResponse<'a> {
    pub success: bool,
    pub operation: &'static str,
    pub code: &'a str,
    pub formatted: &'a str,
    pub sequence: i64,
}

/// Response for decode operations.
#[derive(Serialize)]
pub struct DecodeResponse<'a> {
    pub success: bool,
    pub operation: &'static str,
    pub record: &'a TicketRecord,
}

/// Response for format operations.
#[derive(Serialize)]
pub struct FormatResponse<'a> {
    pub success: bool,
    pub operation: &'static str,
    pub formatted: &'a str,
}

/// Response for validate operations.
#[derive(Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub operation: &'static str,
    pub valid: bool,
}

/// Response for components operations.
#[derive(Serialize)]
pub struct ComponentsResponse<'a> {
    pub success: bool,
    pub operation: &'static str,
    pub components: &'a CodeComponents,
}

/// Response for sequence operations.
#[derive(Serialize)]
pub struct SequenceResponse {
    pub success: bool,
    pub operation: &'static str,
    pub sequence: u32,
}

/// Error response.
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub success: bool,
    pub operation: &'a str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<&'static str, String>,
}

fn to_json<T: Serialize>(response: &T) -> Result<String, String> {
    serde_json::to_string(response).map_err(|e| format!("Failed to serialize response: {}", e))
}

pub fn generate_response(code: &str, formatted: &str, sequence: i64) -> Result<String, String> {
    to_json(&GenerateResponse {
        success: true,
        operation: "generate",
        code,
        formatted,
        sequence,
    })
}

pub fn decode_response(record: &TicketRecord) -> Result<String, String> {
    to_json(&DecodeResponse {
        success: true,
        operation: "decode",
        record,
    })
}

pub fn format_response(formatted: &str) -> Result<String, String> {
    to_json(&FormatResponse {
        success: true,
        operation: "format",
        formatted,
    })
}

pub fn validate_response(valid: bool) -> Result<String, String> {
    to_json(&ValidateResponse {
        success: true,
        operation: "validate",
        valid,
    })
}

pub fn components_response(components: &CodeComponents) -> Result<String, String> {
    to_json(&ComponentsResponse {
        success: true,
        operation: "components",
        components,
    })
}

pub fn sequence_response(sequence: u32) -> Result<String, String> {
    to_json(&SequenceResponse {
        success: true,
        operation: "sequence",
        sequence,
    })
}

/// Error response for a codec failure, carrying its taxonomy code and details.
pub fn codec_error_response(operation: &str, err: &CodeError) -> String {
    error_json(ErrorResponse {
        success: false,
        operation,
        error: err.to_string(),
        code: Some(err.kind().as_str()),
        details: err.details(),
    })
}

/// Error response for a request-level failure (bad JSON, missing field, config).
pub fn error_response(operation: &str, error: &str) -> String {
    error_json(ErrorResponse {
        success: false,
        operation,
        error: error.to_string(),
        code: None,
        details: BTreeMap::new(),
    })
}

fn error_json(response: ErrorResponse<'_>) -> String {
    serde_json::to_string(&response).unwrap_or_else(|_| {
        format!(
            r#"{{"success":false,"operation":"{}","error":"{}"}}"#,
            response.operation,
            response.error.replace('"', "'")
        )
    })
}
