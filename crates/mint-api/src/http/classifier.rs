//! Response classification
//!
//! Turns a completed HTTP exchange into one of three outcomes. The backend can
//! report a business error with a 2xx status through an envelope
//! `{"error_code": <int>, "error_message": <string>}`, where a missing or zero
//! code means success.

use serde_json::Value;

use crate::error::{Error, Result};

/// Classified result of one request attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// The parsed response body
    Success(Value),
    /// The backend rejected the credentials (401 or 410)
    AuthorizationFailure,
    /// Any other backend failure
    TransientFailure {
        /// HTTP status or application error code
        code: i64,
        /// Status text or application error message
        message: String,
    },
}

impl ResponseOutcome {
    /// Convert into the payload, or the error the outcome stands for.
    pub fn into_result(self) -> Result<Value> {
        match self {
            ResponseOutcome::Success(body) => Ok(body),
            ResponseOutcome::AuthorizationFailure => Err(Error::NotAuthorized),
            ResponseOutcome::TransientFailure { code, message } => {
                Err(Error::Api { code, message })
            }
        }
    }
}

/// Classify a response.
///
/// - 401 and 410 are authorization failures whatever the body says
/// - any other status outside 2xx is a transient failure carrying the status
///   and its reason phrase
/// - a 2xx body is parsed as JSON (an empty body is `null`); an error envelope
///   with a non-zero code turns it into a transient failure
///
/// # Errors
///
/// Returns [`Error::Parse`] if a 2xx body is not valid JSON.
pub fn classify(status: u16, status_text: &str, body: &[u8]) -> Result<ResponseOutcome> {
    match status {
        200..=299 => {}
        401 | 410 => return Ok(ResponseOutcome::AuthorizationFailure),
        _ => {
            return Ok(ResponseOutcome::TransientFailure {
                code: i64::from(status),
                message: status_text.to_string(),
            });
        }
    }

    let body = parse_body(body)?;

    match error_code(&body) {
        Some(code) => {
            let message = body
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok(ResponseOutcome::TransientFailure { code, message })
        }
        None => Ok(ResponseOutcome::Success(body)),
    }
}

fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Non-zero `error_code`, given either as a number or a numeric string.
fn error_code(body: &Value) -> Option<i64> {
    let code = match body.get("error_code")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (code != 0).then_some(code)
}
