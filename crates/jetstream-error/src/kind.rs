// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error kinds and the capability tags they carry.
//!
//! An [`ErrorKind`] names exactly one concrete error. Each kind carries a
//! static set of [`Capability`] tags so a caller that only knows one axis
//! ("is this a not-found condition?") can match without knowing the concrete
//! kind.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// A behavioural contract an error kind satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Any error raised by the JetStream layer.
    JetStream,
    /// Server-originated API error family.
    Api,
    /// Status 503.
    ServiceUnavailable,
    /// Status 500.
    Server,
    /// Status 404 or a locally detected missing resource.
    NotFound,
    /// Status 400 or a locally detected rejected request.
    BadRequest,
    /// Key-Value store error.
    KeyValue,
    /// Object store error.
    ObjectStore,
    /// General client timeout.
    Timeout,
}

impl Capability {
    /// Stable snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JetStream => "jet_stream",
            Self::Api => "api",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Server => "server",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::KeyValue => "key_value",
            Self::ObjectStore => "object_store",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Origin / domain axes
// ---------------------------------------------------------------------------

/// Where an error kind comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    /// Detected by client code; never carries a server status.
    Local,
    /// Belongs to the API error family.
    Api,
}

/// Facade that raises a kind, when it is specific to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDomain {
    /// Key-Value store.
    KeyValue,
    /// Object store.
    ObjectStore,
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Every concrete error the taxonomy can produce.
///
/// Serialises to a stable snake_case tag. [`ErrorKind::name`] is the
/// human-facing kind name embedded in rendered messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // -- API family --
    /// Generic API error; also the fallback for unknown status codes.
    Api,
    /// Status 503.
    ServiceUnavailable,
    /// Status 500.
    Server,
    /// Status 404.
    NotFound,
    /// Status 400.
    BadRequest,

    // -- Key-Value --
    /// Key-Value error with no more specific kind.
    KeyValue,
    /// Key exists only as a delete or purge marker.
    KeyDeleted,
    /// Key does not exist.
    KeyNotFound,
    /// Optimistic update used a stale last sequence.
    KeyWrongLastSequence,
    /// Bucket holds no keys.
    NoKeys,
    /// Requested history exceeds [`crate::KV_MAX_HISTORY`].
    KeyHistoryTooLarge,
    /// Bucket to bind to does not exist.
    BucketNotFound,
    /// Bucket exists but is not a valid Key-Value bucket.
    BadBucket,

    // -- Object store --
    /// Object name failed validation.
    InvalidObjectName,
    /// Stored object metadata could not be decoded.
    BadObjectMeta,
    /// Object is a link to a whole bucket.
    LinkIsABucket,
    /// Downloaded object digest differs from the stored digest.
    DigestMismatch,
    /// Object does not exist.
    ObjectNotFound,
    /// Object was deleted.
    ObjectDeleted,
    /// Object already exists.
    ObjectAlreadyExists,

    // -- Client-local --
    /// Bucket name failed validation.
    InvalidBucketName,
    /// Publish got no response from a stream.
    NoStreamResponse,
    /// Too many async publishes are waiting for an ack.
    TooManyStalledMsgs,
    /// Pull consumer fetch timed out.
    FetchTimeout,
    /// Heartbeat-mode consumer observed a sequence gap.
    ConsumerSequenceMismatch,
}

/// How a kind renders itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Template {
    /// `nats: <Name>: code=.. err_code=.. description='..'`
    Api,
    /// `nats: JetStream.<Name> <description>`
    Base,
    /// `nats: <fixed text>`
    Fixed(&'static str),
    /// `nats: key not found[: <message>]`
    KeyNotFound,
    /// `nats: <description>`
    Description,
    /// Consumer sequence gap report.
    SequenceMismatch,
}

use Capability as C;

const API: &[Capability] = &[C::JetStream, C::Api];
const SERVICE_UNAVAILABLE: &[Capability] = &[C::JetStream, C::Api, C::ServiceUnavailable];
const SERVER: &[Capability] = &[C::JetStream, C::Api, C::Server];
const NOT_FOUND: &[Capability] = &[C::JetStream, C::Api, C::NotFound];
const BAD_REQUEST: &[Capability] = &[C::JetStream, C::Api, C::BadRequest];
const KEY_VALUE: &[Capability] = &[C::JetStream, C::Api, C::KeyValue];
const KEY_VALUE_NOT_FOUND: &[Capability] = &[C::JetStream, C::Api, C::KeyValue, C::NotFound];
const KEY_VALUE_BAD_REQUEST: &[Capability] = &[C::JetStream, C::Api, C::KeyValue, C::BadRequest];
const OBJECT_STORE: &[Capability] = &[C::JetStream, C::ObjectStore];
const OBJECT_NOT_FOUND: &[Capability] = &[C::JetStream, C::Api, C::NotFound, C::ObjectStore];
const LOCAL: &[Capability] = &[C::JetStream];
const TIMEOUT: &[Capability] = &[C::Timeout];

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [ErrorKind] = &[
        Self::Api,
        Self::ServiceUnavailable,
        Self::Server,
        Self::NotFound,
        Self::BadRequest,
        Self::KeyValue,
        Self::KeyDeleted,
        Self::KeyNotFound,
        Self::KeyWrongLastSequence,
        Self::NoKeys,
        Self::KeyHistoryTooLarge,
        Self::BucketNotFound,
        Self::BadBucket,
        Self::InvalidObjectName,
        Self::BadObjectMeta,
        Self::LinkIsABucket,
        Self::DigestMismatch,
        Self::ObjectNotFound,
        Self::ObjectDeleted,
        Self::ObjectAlreadyExists,
        Self::InvalidBucketName,
        Self::NoStreamResponse,
        Self::TooManyStalledMsgs,
        Self::FetchTimeout,
        Self::ConsumerSequenceMismatch,
    ];

    /// Kind name embedded in rendered messages (e.g. `"NotFoundError"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Api => "APIError",
            Self::ServiceUnavailable => "ServiceUnavailableError",
            Self::Server => "ServerError",
            Self::NotFound => "NotFoundError",
            Self::BadRequest => "BadRequestError",
            Self::KeyValue => "KeyValueError",
            Self::KeyDeleted => "KeyDeletedError",
            Self::KeyNotFound => "KeyNotFoundError",
            Self::KeyWrongLastSequence => "KeyWrongLastSequenceError",
            Self::NoKeys => "NoKeysError",
            Self::KeyHistoryTooLarge => "KeyHistoryTooLargeError",
            Self::BucketNotFound => "BucketNotFoundError",
            Self::BadBucket => "BadBucketError",
            Self::InvalidObjectName => "InvalidObjectNameError",
            Self::BadObjectMeta => "BadObjectMetaError",
            Self::LinkIsABucket => "LinkIsABucketError",
            Self::DigestMismatch => "DigestMismatchError",
            Self::ObjectNotFound => "ObjectNotFoundError",
            Self::ObjectDeleted => "ObjectDeletedError",
            Self::ObjectAlreadyExists => "ObjectAlreadyExists",
            Self::InvalidBucketName => "InvalidBucketNameError",
            Self::NoStreamResponse => "NoStreamResponseError",
            Self::TooManyStalledMsgs => "TooManyStalledMsgsError",
            Self::FetchTimeout => "FetchTimeoutError",
            Self::ConsumerSequenceMismatch => "ConsumerSequenceMismatchError",
        }
    }

    /// Stable snake_case tag, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Server => "server",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::KeyValue => "key_value",
            Self::KeyDeleted => "key_deleted",
            Self::KeyNotFound => "key_not_found",
            Self::KeyWrongLastSequence => "key_wrong_last_sequence",
            Self::NoKeys => "no_keys",
            Self::KeyHistoryTooLarge => "key_history_too_large",
            Self::BucketNotFound => "bucket_not_found",
            Self::BadBucket => "bad_bucket",
            Self::InvalidObjectName => "invalid_object_name",
            Self::BadObjectMeta => "bad_object_meta",
            Self::LinkIsABucket => "link_is_a_bucket",
            Self::DigestMismatch => "digest_mismatch",
            Self::ObjectNotFound => "object_not_found",
            Self::ObjectDeleted => "object_deleted",
            Self::ObjectAlreadyExists => "object_already_exists",
            Self::InvalidBucketName => "invalid_bucket_name",
            Self::NoStreamResponse => "no_stream_response",
            Self::TooManyStalledMsgs => "too_many_stalled_msgs",
            Self::FetchTimeout => "fetch_timeout",
            Self::ConsumerSequenceMismatch => "consumer_sequence_mismatch",
        }
    }

    /// Capability tags this kind satisfies.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Api => API,
            Self::ServiceUnavailable => SERVICE_UNAVAILABLE,
            Self::Server => SERVER,
            Self::NotFound | Self::BucketNotFound => NOT_FOUND,
            Self::BadRequest => BAD_REQUEST,
            Self::KeyValue | Self::NoKeys | Self::KeyHistoryTooLarge | Self::BadBucket => {
                KEY_VALUE
            }
            Self::KeyDeleted | Self::KeyNotFound => KEY_VALUE_NOT_FOUND,
            Self::KeyWrongLastSequence => KEY_VALUE_BAD_REQUEST,
            Self::InvalidObjectName
            | Self::BadObjectMeta
            | Self::LinkIsABucket
            | Self::DigestMismatch
            | Self::ObjectAlreadyExists => OBJECT_STORE,
            Self::ObjectNotFound | Self::ObjectDeleted => OBJECT_NOT_FOUND,
            Self::InvalidBucketName
            | Self::NoStreamResponse
            | Self::TooManyStalledMsgs
            | Self::ConsumerSequenceMismatch => LOCAL,
            Self::FetchTimeout => TIMEOUT,
        }
    }

    /// Returns `true` if this kind carries `cap`.
    pub fn has(&self, cap: Capability) -> bool {
        self.capabilities().contains(&cap)
    }

    /// API family or locally detected.
    pub fn origin(&self) -> ErrorOrigin {
        if self.has(Capability::Api) {
            ErrorOrigin::Api
        } else {
            ErrorOrigin::Local
        }
    }

    /// The facade this kind is specific to. Kinds shared by both stores
    /// (bucket lookup and naming) have no domain.
    pub fn domain(&self) -> Option<ErrorDomain> {
        if self.has(Capability::KeyValue) {
            Some(ErrorDomain::KeyValue)
        } else if self.has(Capability::ObjectStore) {
            Some(ErrorDomain::ObjectStore)
        } else {
            None
        }
    }

    pub(crate) fn template(&self) -> Template {
        match self {
            Self::Api
            | Self::ServiceUnavailable
            | Self::Server
            | Self::NotFound
            | Self::BadRequest
            | Self::KeyValue
            | Self::BucketNotFound
            | Self::BadBucket
            | Self::ObjectNotFound
            | Self::ObjectDeleted => Template::Api,
            Self::KeyDeleted => Template::Fixed("key was deleted"),
            Self::KeyNotFound => Template::KeyNotFound,
            Self::KeyWrongLastSequence => Template::Description,
            Self::NoKeys => Template::Fixed("no keys found"),
            Self::KeyHistoryTooLarge => Template::Fixed("history limited to a max of 64"),
            Self::InvalidObjectName
            | Self::BadObjectMeta
            | Self::LinkIsABucket
            | Self::DigestMismatch
            | Self::ObjectAlreadyExists
            | Self::InvalidBucketName => Template::Base,
            Self::NoStreamResponse => Template::Fixed("no response from stream"),
            Self::TooManyStalledMsgs => {
                Template::Fixed("stalled with too many outstanding async published messages")
            }
            Self::FetchTimeout => Template::Fixed("fetch timeout"),
            Self::ConsumerSequenceMismatch => Template::SequenceMismatch,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
