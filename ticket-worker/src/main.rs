//! Ticket code worker.
//!
//! Reads one JSON request from stdin and writes one JSON response to stdout:
//! - generate: build a code from event/date/category/seat/sequence
//! - decode: validate a code and return its fields
//! - format / validate / components: inspect a code
//! - sequence: draw a fresh sequence number
//!
//! Logs go to stderr (see `RUST_LOG`), so stdout only ever holds the response.

mod config;
mod input;
mod output;

use std::io::{self, Read, Write};

use config::WorkerConfig;
use input::{GenerateInput, Operation, WorkerRequest};
use tracing::{debug, info};

/// Why a request failed: request-level problems are plain strings, codec
/// failures keep their taxonomy.
enum Failure {
    Request(String),
    Codec(ticket_code::CodeError),
}

impl From<String> for Failure {
    fn from(e: String) -> Self {
        Failure::Request(e)
    }
}

impl From<ticket_code::CodeError> for Failure {
    fn from(e: ticket_code::CodeError) -> Self {
        Failure::Codec(e)
    }
}

fn main() {
    config::init_logging();

    let mut input_str = String::new();
    let response = match io::stdin().read_to_string(&mut input_str) {
        Ok(_) => handle(&input_str),
        Err(e) => output::error_response("unknown", &format!("Failed to read stdin: {}", e)),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = out.write_all(response.as_bytes());
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

/// Turn a raw request into a response line, success or not.
fn handle(input_str: &str) -> String {
    let request = match input::parse_request(input_str) {
        Ok(request) => request,
        Err(e) => return output::error_response("unknown", &e),
    };
    let operation = request.operation();

    match run(request) {
        Ok(response) => response,
        Err(Failure::Request(e)) => output::error_response(operation.as_str(), &e),
        Err(Failure::Codec(e)) => {
            debug!(operation = operation.as_str(), code = e.kind().as_str(), "request failed");
            output::codec_error_response(operation.as_str(), &e)
        }
    }
}

fn run(request: WorkerRequest) -> Result<String, Failure> {
    match request {
        WorkerRequest::Generate(req) => run_generate(req),
        WorkerRequest::Code(op, code) => run_code(op, &code),
        WorkerRequest::Sequence => Ok(output::sequence_response(ticket_code::generate_sequence())?),
    }
}

/// Handle generate operation.
fn run_generate(req: GenerateInput) -> Result<String, Failure> {
    // 1. Load policy from environment
    let config = WorkerConfig::from_env()?;

    // 2. Fill in a sequence if the caller left it out
    let sequence = req
        .sequence
        .unwrap_or_else(|| ticket_code::generate_sequence() as i64);

    // 3. Build the code
    let code = ticket_code::generate_with(
        config.sequence_overflow,
        &req.event_id,
        req.event_date,
        &req.category_id,
        &req.seat_id,
        sequence,
    )?;
    info!(code = %code, "generated ticket code");

    // 4. Return both renderings
    Ok(output::generate_response(
        &code,
        &ticket_code::format(&code),
        sequence,
    )?)
}

/// Handle the single-code operations.
fn run_code(op: Operation, code: &str) -> Result<String, Failure> {
    let response = match op {
        Operation::Decode => output::decode_response(&ticket_code::decode(code)?)?,
        Operation::Format => output::format_response(&ticket_code::format(code))?,
        Operation::Validate => output::validate_response(ticket_code::is_valid_format(code))?,
        Operation::Components => {
            output::components_response(&ticket_code::extract_components(code)?)?
        }
        Operation::Generate | Operation::Sequence => {
            return Err(Failure::Request(format!(
                "Operation {} does not take a code",
                op.as_str()
            )))
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_then_decode() {
        let generated = handle(
            r#"{"operation":"generate","event_id":"12345","event_date":"2025-12-25",
                "category_id":"100","seat_id":"500","sequence":999}"#,
        );
        let value: serde_json::Value = serde_json::from_str(&generated).unwrap();
        assert_eq!(value["success"], true);
        let code = value["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 24);

        let decoded = handle(&format!(r#"{{"code":"{}"}}"#, value["formatted"].as_str().unwrap()));
        let value: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["record"]["sequence"], 999);
        assert_eq!(value["record"]["event_date"], "2025-12-25");
        assert_eq!(value["record"]["encoded_id"], code.as_str());
    }

    #[test]
    fn test_codec_error_carries_taxonomy() {
        let response = handle(
            r#"{"operation":"generate","event_id":"33554432","event_date":"2025-12-25",
                "category_id":"1","seat_id":"1","sequence":0}"#,
        );
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["operation"], "generate");
        assert_eq!(value["code"], "VALUE_OUT_OF_RANGE");
        assert_eq!(value["details"]["field"], "event_id");
    }

    #[test]
    fn test_validate_and_components() {
        let response = handle(r#"{"operation":"validate","code":"SHORT"}"#);
        assert!(response.contains("\"valid\":false"));

        let response = handle(r#"{"operation":"components","code":"01234-56789-012-34567-8901-23"}"#);
        assert!(response.contains("\"event_id\":\"01234\""));
    }

    #[test]
    fn test_bad_request() {
        let response = handle("{");
        assert!(response.contains("\"success\":false"));
        assert!(response.contains("\"operation\":\"unknown\""));
    }

    #[test]
    fn test_sequence_operation() {
        let response = handle(r#"{"operation":"sequence"}"#);
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(value["sequence"].as_u64().unwrap() < 1_048_576);
    }
}
