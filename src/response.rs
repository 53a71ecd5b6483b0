//! Payloads exchanged with the note-generation service.
//!
//! Only the `markdown` field ever reaches the parser; the rest is carried so
//! callers can report rate limits and errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::block::Block;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Malformed service response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service error: {0}")]
    Service(String),
}

/// Note style requested from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    #[default]
    Cornell,
    Dev,
    Summary,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub url: String,
    #[serde(default)]
    pub mode: NoteMode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateLimit {
    pub remaining: u32,
    pub limit: u32,
    #[serde(default)]
    pub used: Option<u32>,
    #[serde(default)]
    pub reset_at: Option<String>,
    #[serde(default)]
    pub reset_in_hours: Option<f64>,
}

/// Successful reply to `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub markdown: String,
    #[serde(default)]
    pub rate_limit: Option<RateLimit>,
}

/// Reply to `GET /api/rate-limit-info`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateLimitInfo {
    pub rate_limit: RateLimit,
    pub is_limited: bool,
}

/// Non-2xx body: `detail` is either a bare string or `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Message { message: String },
}

impl ErrorPayload {
    pub fn message(&self) -> &str {
        match &self.detail {
            ErrorDetail::Text(text) => text,
            ErrorDetail::Message { message } => message,
        }
    }
}

impl GenerateResponse {
    /// Parse a response body, turning an error payload into
    /// [`ResponseError::Service`].
    pub fn from_json(body: &str) -> Result<Self, ResponseError> {
        let value: Value = serde_json::from_str(body)?;
        if value.get("markdown").is_none() {
            if let Ok(error) = serde_json::from_value::<ErrorPayload>(value.clone()) {
                return Err(ResponseError::Service(error.message().to_string()));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn blocks(&self) -> Vec<Block> {
        crate::parse(&self.markdown)
    }
}

/// Parse a JSON value that should hold markdown. Anything but a string
/// yields no blocks.
pub fn blocks_from_value(value: &Value) -> Vec<Block> {
    match value.as_str() {
        Some(markdown) => crate::parse(markdown),
        None => {
            log::debug!("Expected markdown string, got {value}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn generate_response_with_rate_limit() {
        let response = GenerateResponse::from_json(
            r##"{"status":"success","markdown":"# Notes","rate_limit":{"remaining":4,"limit":5,"used":1}}"##,
        )
        .unwrap();
        assert_eq!(response.status.as_deref(), Some("success"));
        assert_eq!(
            response.rate_limit,
            Some(RateLimit {
                remaining: 4,
                limit: 5,
                used: Some(1),
                reset_at: None,
                reset_in_hours: None,
            })
        );
        assert_eq!(response.blocks().len(), 1);
    }

    #[test]
    fn error_detail_string() {
        let err = GenerateResponse::from_json(r#"{"detail":"Invalid YouTube URL"}"#).unwrap_err();
        assert!(matches!(err, ResponseError::Service(ref m) if m == "Invalid YouTube URL"));
    }

    #[test]
    fn error_detail_message() {
        let err = GenerateResponse::from_json(r#"{"detail":{"message":"Rate limit exceeded"}}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Service error: Rate limit exceeded");
    }

    #[test]
    fn malformed_body() {
        assert!(matches!(
            GenerateResponse::from_json("not json"),
            Err(ResponseError::Json(_))
        ));
        assert!(matches!(
            GenerateResponse::from_json(r#"{"status":"success"}"#),
            Err(ResponseError::Json(_))
        ));
    }

    #[test]
    fn rate_limit_info() {
        let info: RateLimitInfo = serde_json::from_value(json!({
            "rate_limit": {"remaining": 0, "limit": 5, "reset_in_hours": 2.5},
            "is_limited": true
        }))
        .unwrap();
        assert!(info.is_limited);
        assert_eq!(info.rate_limit.reset_in_hours, Some(2.5));
    }

    #[test]
    fn request_mode_defaults_to_cornell() {
        let request: GenerateRequest =
            serde_json::from_value(json!({"url": "https://youtu.be/x"})).unwrap();
        assert_eq!(request.mode, NoteMode::Cornell);
        assert_eq!(
            serde_json::to_value(GenerateRequest {
                url: "u".to_string(),
                mode: NoteMode::Summary,
            })
            .unwrap(),
            json!({"url": "u", "mode": "summary"})
        );
    }

    #[test]
    fn non_string_values_yield_nothing() {
        assert!(blocks_from_value(&json!(null)).is_empty());
        assert!(blocks_from_value(&json!(42)).is_empty());
        assert!(blocks_from_value(&json!({"markdown": "# x"})).is_empty());
        assert_eq!(blocks_from_value(&json!("# x\n\ny")).len(), 2);
    }
}
