//! Input parsing for the ticket worker.
//!
//! Parses the JSON request read from stdin. The `operation` field selects
//! what to do; it defaults to "decode".

use chrono::NaiveDate;
use serde::Deserialize;

/// Operations the worker can perform.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Generate,
    #[default]
    Decode,
    Format,
    Validate,
    Components,
    Sequence,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Decode => "decode",
            Operation::Format => "format",
            Operation::Validate => "validate",
            Operation::Components => "components",
            Operation::Sequence => "sequence",
        }
    }
}

/// Parsed worker input.
#[derive(Debug, PartialEq)]
pub enum WorkerRequest {
    Generate(GenerateInput),
    /// Decode, format, validate or components on a single code.
    Code(Operation, String),
    Sequence,
}

impl WorkerRequest {
    pub fn operation(&self) -> Operation {
        match self {
            WorkerRequest::Generate(_) => Operation::Generate,
            WorkerRequest::Code(op, _) => *op,
            WorkerRequest::Sequence => Operation::Sequence,
        }
    }
}

/// Input for generate operations.
#[derive(Debug, PartialEq)]
pub struct GenerateInput {
    pub event_id: String,
    pub event_date: NaiveDate,
    pub category_id: String,
    pub seat_id: String,
    /// Filled from `generate_sequence` when absent.
    pub sequence: Option<i64>,
}

/// Raw input that can be any operation type.
#[derive(Debug, Deserialize)]
struct RawInput {
    #[serde(default)]
    operation: Operation,
    // Generate fields (optional)
    event_id: Option<IdValue>,
    event_date: Option<String>,
    category_id: Option<IdValue>,
    seat_id: Option<IdValue>,
    sequence: Option<i64>,
    // Code fields (optional)
    code: Option<String>,
}

/// Identifiers may arrive as JSON strings or numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(u64),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Text(s) => s,
            IdValue::Number(n) => n.to_string(),
        }
    }
}

/// Parse input JSON from stdin into a WorkerRequest.
pub fn parse_request(input_str: &str) -> Result<WorkerRequest, String> {
    let raw: RawInput =
        serde_json::from_str(input_str).map_err(|e| format!("Invalid input JSON: {}", e))?;

    match raw.operation {
        Operation::Generate => {
            let event_id = raw
                .event_id
                .ok_or("Missing event_id for generate operation")?
                .into_string();
            let event_date = raw
                .event_date
                .ok_or("Missing event_date for generate operation")?;
            let event_date = parse_date(&event_date)?;
            let category_id = raw
                .category_id
                .ok_or("Missing category_id for generate operation")?
                .into_string();
            let seat_id = raw
                .seat_id
                .ok_or("Missing seat_id for generate operation")?
                .into_string();

            Ok(WorkerRequest::Generate(GenerateInput {
                event_id,
                event_date,
                category_id,
                seat_id,
                sequence: raw.sequence,
            }))
        }
        Operation::Sequence => Ok(WorkerRequest::Sequence),
        op => {
            let code = raw
                .code
                .ok_or_else(|| format!("Missing code for {} operation", op.as_str()))?;
            Ok(WorkerRequest::Code(op, code))
        }
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid event_date '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_generate() {
        let json = r#"{
            "operation": "generate",
            "event_id": "12345",
            "event_date": "2025-12-25",
            "category_id": 100,
            "seat_id": "500",
            "sequence": 999
        }"#;

        let request = parse_request(json).unwrap();
        match request {
            WorkerRequest::Generate(input) => {
                assert_eq!(input.event_id, "12345");
                assert_eq!(input.event_date, NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
                assert_eq!(input.category_id, "100");
                assert_eq!(input.seat_id, "500");
                assert_eq!(input.sequence, Some(999));
            }
            _ => panic!("Expected Generate request"),
        }
    }

    #[test]
    fn test_parse_request_generate_without_sequence() {
        let json = r#"{
            "operation": "generate",
            "event_id": "gala",
            "event_date": "2024-02-29",
            "category_id": "vip",
            "seat_id": "A-12"
        }"#;

        match parse_request(json).unwrap() {
            WorkerRequest::Generate(input) => assert_eq!(input.sequence, None),
            _ => panic!("Expected Generate request"),
        }
    }

    #[test]
    fn test_parse_request_decode_default() {
        // Without explicit operation field, defaults to decode
        let json = r#"{"code": "01234-56789-012-34567-8901-23"}"#;

        let request = parse_request(json).unwrap();
        assert_eq!(
            request,
            WorkerRequest::Code(Operation::Decode, "01234-56789-012-34567-8901-23".to_string())
        );
    }

    #[test]
    fn test_parse_request_code_operations() {
        for (name, op) in [
            ("format", Operation::Format),
            ("validate", Operation::Validate),
            ("components", Operation::Components),
        ] {
            let json = format!(r#"{{"operation": "{}", "code": "ABC"}}"#, name);
            let request = parse_request(&json).unwrap();
            assert_eq!(request.operation(), op);
        }
    }

    #[test]
    fn test_parse_request_sequence() {
        let request = parse_request(r#"{"operation": "sequence"}"#).unwrap();
        assert_eq!(request, WorkerRequest::Sequence);
    }

    #[test]
    fn test_parse_request_missing_fields() {
        let err = parse_request(r#"{"operation": "generate", "event_id": "1"}"#).unwrap_err();
        assert!(err.contains("event_date"));

        let err = parse_request(r#"{"operation": "validate"}"#).unwrap_err();
        assert_eq!(err, "Missing code for validate operation");
    }

    #[test]
    fn test_parse_request_bad_json() {
        assert!(parse_request("not json").unwrap_err().starts_with("Invalid input JSON"));
        assert!(parse_request(r#"{"operation": "delete"}"#).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("25/12/2025").is_err());
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
