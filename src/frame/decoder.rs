//! # Telemetry Decoder
//!
//! Decodes inbound telemetry lines into numeric vectors.

use crate::error::{JoyLinkError, Result};

/// Decode one inbound telemetry line
///
/// Strips surrounding whitespace and, if present, the legacy `b'...'`
/// textual wrapper (an artifact of a previous encoding mismatch on the peer
/// side; a compatibility shim, not a designed feature). The remainder is
/// split on commas and every field parsed as a floating-point number.
///
/// # Arguments
///
/// * `line` - Raw line as read from the serial port
///
/// # Returns
///
/// * `Result<Vec<f64>>` - Parsed values, or `Parse` if the line is empty or
///   any field is not numeric
///
/// # Errors
///
/// `JoyLinkError::Parse` is recoverable; the caller logs it and keeps the
/// loop running.
///
/// # Examples
///
/// ```
/// use joylink::frame::decode_telemetry;
///
/// let values = decode_telemetry("b'0.12,-0.98,1,0'").unwrap();
/// assert_eq!(values, vec![0.12, -0.98, 1.0, 0.0]);
/// ```
pub fn decode_telemetry(line: &str) -> Result<Vec<f64>> {
    let trimmed = line.trim();
    let payload = strip_legacy_wrapper(trimmed);

    if payload.is_empty() {
        return Err(JoyLinkError::Parse("empty line".to_string()));
    }

    payload
        .split(',')
        .map(|field| {
            field.parse::<f64>().map_err(|_| {
                JoyLinkError::Parse(format!("non-numeric field {:?} in line {:?}", field, trimmed))
            })
        })
        .collect()
}

/// Strip a `b'...'` wrapper if both delimiters are present
///
/// Lines like `b'0.12,1'` come from a peer that printed a byte string
/// instead of its contents. Anything not wrapped passes through untouched.
fn strip_legacy_wrapper(line: &str) -> &str {
    line.strip_prefix("b'")
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(line)
}
