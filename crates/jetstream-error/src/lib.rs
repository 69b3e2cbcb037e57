// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed error taxonomy for JetStream, Key-Value and Object-Store clients.
//!
//! Every error is a [`JetStreamError`]: an immutable value carrying its
//! [`ErrorKind`], the kind name fixed at construction, an optional description,
//! and whatever payload the kind defines (API status fields, the Key-Value entry
//! a lookup failed on, or a consumer sequence gap).
//!
//! Server replies are turned into errors by [`classify_headers`] (inline status
//! headers) and [`classify_body`] (structured JSON error bodies). Both always
//! return exactly one error; unknown status codes degrade to
//! [`ErrorKind::Api`].
//!
//! ```
//! use jetstream_error::{ApiErrorBody, Capability, ErrorKind, classify_body};
//!
//! let err = classify_body(&ApiErrorBody::new(404).with_description("stream not found"));
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! assert!(err.has_capability(Capability::NotFound));
//! assert_eq!(
//!     err.to_string(),
//!     "nats: NotFoundError: code=404 err_code=None description='stream not found'"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod body;
mod classify;
pub mod config;
mod kind;
mod kv;
pub mod registry;

pub use body::{ApiErrorBody, ApiResponse, BodyError};
pub use classify::{Classifier, ResponseHeaders, classify_body, classify_headers};
pub use config::{ClassifierConfig, ConfigError, ConfigWarning};
pub use kind::{Capability, ErrorDomain, ErrorKind, ErrorOrigin};
pub use kv::{KV_MAX_HISTORY, KvEntry, KvOperation};

use kind::Template;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace prefix of every rendered message.
pub const NAMESPACE: &str = "nats";

/// Rendered in place of an unset field.
pub const ABSENT_MARKER: &str = "None";

// ---------------------------------------------------------------------------
// SequenceMismatch
// ---------------------------------------------------------------------------

/// Sequence numbers reported by a consumer sequence mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SequenceMismatch {
    /// Stream sequence the consumer should be recreated from.
    pub stream_resume_sequence: Option<u64>,
    /// Consumer sequence the client received.
    pub consumer_sequence: Option<u64>,
    /// Consumer sequence the server last delivered.
    pub last_consumer_sequence: Option<u64>,
}

impl SequenceMismatch {
    /// All three sequences known.
    pub fn new(stream_resume_sequence: u64, consumer_sequence: u64, last: u64) -> Self {
        Self {
            stream_resume_sequence: Some(stream_resume_sequence),
            consumer_sequence: Some(consumer_sequence),
            last_consumer_sequence: Some(last),
        }
    }

    /// `last_consumer_sequence - consumer_sequence`.
    ///
    /// Negative when the last sequence is behind the current one; the value is
    /// reported as-is.
    pub fn gap(&self) -> Option<i128> {
        let current = self.consumer_sequence?;
        let last = self.last_consumer_sequence?;
        Some(i128::from(last) - i128::from(current))
    }
}

// ---------------------------------------------------------------------------
// JetStreamError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Detail {
    None,
    Key {
        entry: Option<Box<KvEntry>>,
        op: Option<KvOperation>,
        message: Option<String>,
    },
    Sequence(SequenceMismatch),
}

impl Detail {
    fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::KeyDeleted | ErrorKind::KeyNotFound => Self::Key {
                entry: None,
                op: None,
                message: None,
            },
            ErrorKind::ConsumerSequenceMismatch => Self::Sequence(SequenceMismatch::default()),
            _ => Self::None,
        }
    }
}

/// A classified JetStream error.
///
/// Fields are fixed once the value leaves its constructor; only accessors are
/// public. `code` is set only when the error was built from a server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JetStreamError {
    kind: ErrorKind,
    name: &'static str,
    description: Option<String>,
    code: Option<i64>,
    err_code: Option<i64>,
    stream: Option<String>,
    seq: Option<u64>,
    detail: Detail,
}

impl JetStreamError {
    /// Error of `kind` with no description and no payload.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            name: kind.name(),
            description: None,
            code: None,
            err_code: None,
            stream: None,
            seq: None,
            detail: Detail::for_kind(kind),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Error of `kind` carrying every field of a structured error body.
    pub(crate) fn from_api_body(kind: ErrorKind, body: &ApiErrorBody) -> Self {
        Self {
            description: body.description.clone(),
            code: Some(body.code),
            err_code: body.err_code,
            stream: body.stream.clone(),
            seq: body.seq,
            ..Self::new(kind)
        }
    }

    /// Error of `kind` carrying an inline status and description.
    pub(crate) fn from_status(kind: ErrorKind, code: Option<i64>, description: Option<String>) -> Self {
        Self {
            description,
            code,
            ..Self::new(kind)
        }
    }

    /// Classify a structured error body. See [`classify_body`].
    pub fn from_body(body: &ApiErrorBody) -> Self {
        classify_body(body)
    }

    /// Classify inline reply headers. See [`classify_headers`].
    pub fn from_headers<H: ResponseHeaders + ?Sized>(headers: Option<&H>) -> Self {
        classify_headers(headers)
    }

    /// A lookup found only a delete or purge marker.
    pub fn key_deleted(entry: Option<KvEntry>, op: Option<KvOperation>) -> Self {
        Self {
            detail: Detail::Key {
                entry: entry.map(Box::new),
                op,
                message: None,
            },
            ..Self::new(ErrorKind::KeyDeleted)
        }
    }

    /// A lookup found no such key. `message` is appended to the rendering.
    pub fn key_not_found(
        entry: Option<KvEntry>,
        op: Option<KvOperation>,
        message: Option<String>,
    ) -> Self {
        Self {
            detail: Detail::Key {
                entry: entry.map(Box::new),
                op,
                message,
            },
            ..Self::new(ErrorKind::KeyNotFound)
        }
    }

    /// An update was rejected for a stale last sequence. The server's text is
    /// rendered verbatim.
    pub fn key_wrong_last_sequence(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyWrongLastSequence).with_description(description)
    }

    /// A heartbeat-mode consumer saw a sequence gap.
    pub fn consumer_sequence_mismatch(
        stream_resume_sequence: u64,
        consumer_sequence: u64,
        last_consumer_sequence: u64,
    ) -> Self {
        Self {
            detail: Detail::Sequence(SequenceMismatch::new(
                stream_resume_sequence,
                consumer_sequence,
                last_consumer_sequence,
            )),
            ..Self::new(ErrorKind::ConsumerSequenceMismatch)
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Concrete kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Kind name stored at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Optional human description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Server status code.
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// JetStream-specific error code.
    pub fn err_code(&self) -> Option<i64> {
        self.err_code
    }

    /// Stream named by the server.
    pub fn stream(&self) -> Option<&str> {
        self.stream.as_deref()
    }

    /// Stream sequence named by the server.
    pub fn seq(&self) -> Option<u64> {
        self.seq
    }

    /// Entry a key lookup failed on.
    pub fn entry(&self) -> Option<&KvEntry> {
        match &self.detail {
            Detail::Key { entry, .. } => entry.as_deref(),
            _ => None,
        }
    }

    /// Operation a key lookup observed.
    pub fn op(&self) -> Option<KvOperation> {
        match &self.detail {
            Detail::Key { op, .. } => *op,
            _ => None,
        }
    }

    /// Extra message of a key-not-found error.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Detail::Key { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Sequences of a consumer sequence mismatch.
    pub fn sequence_mismatch(&self) -> Option<&SequenceMismatch> {
        match &self.detail {
            Detail::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    // -- capabilities -------------------------------------------------------

    /// Capability tags of this error's kind.
    pub fn capabilities(&self) -> &'static [Capability] {
        self.kind.capabilities()
    }

    /// Returns `true` if this error satisfies `cap`.
    pub fn has_capability(&self, cap: Capability) -> bool {
        self.kind.has(cap)
    }

    /// Shorthand for `self.kind().origin()`.
    pub fn origin(&self) -> ErrorOrigin {
        self.kind.origin()
    }

    /// Shorthand for `self.kind().domain()`.
    pub fn domain(&self) -> Option<ErrorDomain> {
        self.kind.domain()
    }

    /// `true` if a server status was attached.
    pub fn is_server_originated(&self) -> bool {
        self.code.is_some()
    }

    /// Raised by the JetStream layer.
    pub fn is_jetstream(&self) -> bool {
        self.has_capability(Capability::JetStream)
    }

    /// Member of the API error family.
    pub fn is_api(&self) -> bool {
        self.has_capability(Capability::Api)
    }

    /// A missing resource, whatever the domain.
    pub fn is_not_found(&self) -> bool {
        self.has_capability(Capability::NotFound)
    }

    /// A rejected request.
    pub fn is_bad_request(&self) -> bool {
        self.has_capability(Capability::BadRequest)
    }

    /// Status 503.
    pub fn is_service_unavailable(&self) -> bool {
        self.has_capability(Capability::ServiceUnavailable)
    }

    /// Status 500.
    pub fn is_server(&self) -> bool {
        self.has_capability(Capability::Server)
    }

    /// Key-Value store error.
    pub fn is_key_value(&self) -> bool {
        self.has_capability(Capability::KeyValue)
    }

    /// Object store error.
    pub fn is_object_store(&self) -> bool {
        self.has_capability(Capability::ObjectStore)
    }

    /// Client timeout.
    pub fn is_timeout(&self) -> bool {
        self.has_capability(Capability::Timeout)
    }
}

struct OrNone<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for OrNone<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str(ABSENT_MARKER),
        }
    }
}

impl fmt::Display for JetStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.template() {
            Template::Api => write!(
                f,
                "{NAMESPACE}: {}: code={} err_code={} description='{}'",
                self.name,
                OrNone(&self.code),
                OrNone(&self.err_code),
                OrNone(&self.description),
            ),
            Template::Base => write!(
                f,
                "{NAMESPACE}: JetStream.{} {}",
                self.name,
                self.description.as_deref().unwrap_or_default(),
            ),
            Template::Fixed(text) => write!(f, "{NAMESPACE}: {text}"),
            Template::KeyNotFound => {
                write!(f, "{NAMESPACE}: key not found")?;
                match self.message() {
                    Some(msg) if !msg.is_empty() => write!(f, ": {msg}"),
                    _ => Ok(()),
                }
            }
            Template::Description => {
                write!(f, "{NAMESPACE}: {}", OrNone(&self.description))
            }
            Template::SequenceMismatch => {
                let seq = self.sequence_mismatch().copied().unwrap_or_default();
                write!(
                    f,
                    "{NAMESPACE}: sequence mismatch for consumer at sequence {} ({} sequences behind), \
                     should restart consumer from stream sequence {}",
                    OrNone(&seq.consumer_sequence),
                    OrNone(&seq.gap()),
                    OrNone(&seq.stream_resume_sequence),
                )
            }
        }
    }
}

impl std::error::Error for JetStreamError {}

// ---------------------------------------------------------------------------
// Serialization support
// ---------------------------------------------------------------------------

/// Serialisable snapshot of a [`JetStreamError`], including its rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct JetStreamErrorDto {
    /// Error kind.
    pub kind: ErrorKind,
    /// Rendered message.
    pub message: String,
    /// Capability tags of the kind.
    pub capabilities: Vec<Capability>,
    /// Server status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// JetStream error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_code: Option<i64>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stream name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    /// Stream sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    /// Key-Value entry of a key lookup error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<KvEntry>,
    /// Key-Value operation of a key lookup error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<KvOperation>,
    /// Extra message of a key-not-found error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_message: Option<String>,
    /// Sequences of a consumer sequence mismatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceMismatch>,
}

impl From<&JetStreamError> for JetStreamErrorDto {
    fn from(err: &JetStreamError) -> Self {
        Self {
            kind: err.kind,
            message: err.to_string(),
            capabilities: err.capabilities().to_vec(),
            code: err.code,
            err_code: err.err_code,
            description: err.description.clone(),
            stream: err.stream.clone(),
            seq: err.seq,
            entry: err.entry().cloned(),
            op: err.op(),
            key_message: err.message().map(str::to_owned),
            sequence: err.sequence_mismatch().copied(),
        }
    }
}

impl From<JetStreamErrorDto> for JetStreamError {
    fn from(dto: JetStreamErrorDto) -> Self {
        let mut err = Self::new(dto.kind);
        err.description = dto.description;
        // Status fields only belong to the API family.
        if dto.kind.origin() == ErrorOrigin::Api {
            err.code = dto.code;
            err.err_code = dto.err_code;
            err.stream = dto.stream;
            err.seq = dto.seq;
        }
        err.detail = match err.detail {
            Detail::Key { .. } => Detail::Key {
                entry: dto.entry.map(Box::new),
                op: dto.op,
                message: dto.key_message,
            },
            Detail::Sequence(_) => Detail::Sequence(dto.sequence.unwrap_or_default()),
            Detail::None => Detail::None,
        };
        err
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
