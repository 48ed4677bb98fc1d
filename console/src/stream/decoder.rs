//! Decoding of inbound stream frames into log entries

use serde_json::{Map, Value};

use crate::errors::DecodeError;
use crate::models::log_entry::{EntryPayload, EntryType, LogEntry};

/// Decode one text frame from the live log stream.
///
/// The frame must be a JSON object whose `entry_type` is one of the known
/// tags. Every other field is optional and defaults when absent.
pub fn decode(text: &str) -> Result<LogEntry, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(DecodeError::Malformed("expected a JSON object".to_string()));
    };

    let entry_type = take_entry_type(&mut object)?;

    let payload: EntryPayload = serde_json::from_value(Value::Object(object))
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    Ok(LogEntry::new(entry_type, payload))
}

/// Decode a binary frame; it has to be UTF-8 JSON like a text frame
pub fn decode_bytes(bytes: &[u8]) -> Result<LogEntry, DecodeError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DecodeError::Malformed(format!("invalid UTF-8: {}", e)))?;
    decode(text)
}

fn take_entry_type(object: &mut Map<String, Value>) -> Result<EntryType, DecodeError> {
    match object.remove("entry_type") {
        None | Some(Value::Null) => Err(DecodeError::MissingEntryType),
        Some(Value::String(tag)) => tag.parse().map_err(DecodeError::UnknownEntryType),
        Some(other) => Err(DecodeError::UnknownEntryType(other.to_string())),
    }
}
