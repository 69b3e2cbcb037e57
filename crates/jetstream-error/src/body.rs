// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured JSON error bodies returned by the JetStream API.

use crate::{JetStreamError, classify_body};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to decode a structured error body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The payload is not valid JSON or lacks the required `code`.
    #[error("invalid API error body: {0}")]
    Json(#[from] serde_json::Error),
}

/// The `error` member of a JetStream API reply.
///
/// Only `code` is required. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiErrorBody {
    /// Status code, modelled on HTTP.
    pub code: i64,
    /// JetStream-specific error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_code: Option<i64>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stream the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    /// Stream sequence the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl ApiErrorBody {
    /// Body with only a status code.
    pub fn new(code: i64) -> Self {
        Self {
            code,
            err_code: None,
            description: None,
            stream: None,
            seq: None,
        }
    }

    /// Set the JetStream error code.
    pub fn with_err_code(mut self, err_code: i64) -> Self {
        self.err_code = Some(err_code);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the stream name.
    pub fn with_stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Set the stream sequence.
    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    /// Decode a bare error object.
    pub fn from_json(json: &str) -> Result<Self, BodyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode from an already parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, BodyError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Classify this body. See [`classify_body`].
    pub fn classify(&self) -> JetStreamError {
        classify_body(self)
    }
}

/// A full JetStream API reply, reduced to the parts that matter for errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApiResponse {
    /// Reply schema type, e.g. `io.nats.jetstream.api.v1.stream_info_response`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    /// Present when the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

impl ApiResponse {
    /// Decode a reply payload.
    pub fn from_json(json: &str) -> Result<Self, BodyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `true` if the reply carries an `error` member.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The classified error, if the reply carries one.
    pub fn error(&self) -> Option<JetStreamError> {
        self.error.as_ref().map(classify_body)
    }

    /// `Ok(self)` for a successful reply, the classified error otherwise.
    pub fn into_result(self) -> Result<Self, JetStreamError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
