//! Response formatting for the handler layer
//!
//! Every response travels with a success transport status; the outcome is
//! carried in the body, either as JSON:
//!
//! ```json
//! { "status": "SUCCESS", "message": "..." }
//! ```
//!
//! or, when the client asked for `raw` output, as two plain-text lines:
//!
//! ```text
//! FAIL
//! Validation of hashes failed.
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use crate::error::Result;

/// Transport status used for every response
pub const STATUS_CODE_OK: u16 = 200;

/// Content type of JSON responses
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type of raw responses
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Outcome reported in the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The request succeeded
    Success,
    /// The request failed; the message says why
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("SUCCESS"),
            Status::Fail => f.write_str("FAIL"),
        }
    }
}

/// Body encoding requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// `{"status": ..., "message": ...}`
    #[default]
    Json,
    /// `STATUS\nmessage`
    Raw,
}

impl ResponseFormat {
    /// Raw if the client passed the `raw` flag, JSON otherwise
    pub fn from_raw_flag(raw: bool) -> Self {
        if raw {
            ResponseFormat::Raw
        } else {
            ResponseFormat::Json
        }
    }

    /// Content type of bodies in this format
    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseFormat::Json => CONTENT_TYPE_JSON,
            ResponseFormat::Raw => CONTENT_TYPE_TEXT,
        }
    }
}

/// A formatted response, independent of the HTTP framework serving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResponse {
    /// Transport status (always [`STATUS_CODE_OK`])
    pub status_code: u16,
    /// Value for the `Content-Type` header
    pub content_type: &'static str,
    /// Encoded body
    pub body: String,
}

impl FunctionResponse {
    /// Build a response with the given status and message
    pub fn new(status: Status, message: impl Into<Value>, format: ResponseFormat) -> Self {
        let message = message.into();
        let body = match format {
            ResponseFormat::Json => json!({ "status": status, "message": message }).to_string(),
            ResponseFormat::Raw => match message {
                Value::String(text) => format!("{}\n{}", status, text),
                other => format!("{}\n{}", status, other),
            },
        };

        Self {
            status_code: STATUS_CODE_OK,
            content_type: format.content_type(),
            body,
        }
    }

    /// A `SUCCESS` response
    pub fn success(message: impl Into<Value>, format: ResponseFormat) -> Self {
        Self::new(Status::Success, message, format)
    }

    /// A `FAIL` response carrying the error's display text
    pub fn fail(error: impl fmt::Display, format: ResponseFormat) -> Self {
        Self::new(Status::Fail, error.to_string(), format)
    }

    /// Format the result of a core operation
    pub fn from_result<T: fmt::Display>(result: &Result<T>, format: ResponseFormat) -> Self {
        match result {
            Ok(value) => Self::success(value.to_string(), format),
            Err(e) => Self::fail(e, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn raw_bodies() {
        let ok = FunctionResponse::success("1.1.1.1", ResponseFormat::Raw);
        assert_eq!(ok.status_code, 200);
        assert_eq!(ok.content_type, "text/plain");
        assert_eq!(ok.body, "SUCCESS\n1.1.1.1");

        let fail = FunctionResponse::fail(Error::HashMismatch, ResponseFormat::Raw);
        assert_eq!(fail.status_code, 200);
        assert_eq!(fail.body, "FAIL\nValidation of hashes failed.");
    }

    #[test]
    fn json_bodies() {
        let ok = FunctionResponse::success("OK", ResponseFormat::Json);
        assert_eq!(ok.content_type, "application/json");
        let body: Value = serde_json::from_str(&ok.body).unwrap();
        assert_eq!(body, json!({ "status": "SUCCESS", "message": "OK" }));

        let fail = FunctionResponse::fail("Error", ResponseFormat::Json);
        assert_eq!(fail.status_code, 200);
        let body: Value = serde_json::from_str(&fail.body).unwrap();
        assert_eq!(body, json!({ "status": "FAIL", "message": "Error" }));
    }

    #[test]
    fn structured_messages() {
        let message = json!({ "queryStringParameters": {}, "requestContext": {} });
        let ok = FunctionResponse::success(message.clone(), ResponseFormat::Json);
        let body: Value = serde_json::from_str(&ok.body).unwrap();
        assert_eq!(body["message"], message);
    }

    #[test]
    fn from_result_maps_both_arms() {
        let ok: Result<String> = Ok("done".to_string());
        assert_eq!(
            FunctionResponse::from_result(&ok, ResponseFormat::Raw).body,
            "SUCCESS\ndone"
        );

        let err: Result<String> = Err(Error::MultipleRecordValues);
        assert!(
            FunctionResponse::from_result(&err, ResponseFormat::Raw)
                .body
                .starts_with("FAIL\nYou should only have a single value")
        );
    }

    #[test]
    fn format_from_raw_flag() {
        assert_eq!(ResponseFormat::from_raw_flag(true), ResponseFormat::Raw);
        assert_eq!(ResponseFormat::from_raw_flag(false), ResponseFormat::Json);
    }
}
