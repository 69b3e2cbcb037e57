// SPDX-License-Identifier: MIT OR Apache-2.0
//! Status code table and wire header names.

use crate::ErrorKind;

/// Header carrying the numeric status of an inline reply.
pub const STATUS_HEADER: &str = "Status";
/// Header carrying the human description of an inline reply.
pub const DESCRIPTION_HEADER: &str = "Description";

/// Status codes the server uses on JetStream replies.
pub mod status {
    /// Flow-control or heartbeat message.
    pub const CONTROL: i64 = 100;
    /// Malformed or rejected request.
    pub const BAD_REQUEST: i64 = 400;
    /// Missing resource; also "no messages" on a pull request.
    pub const NOT_FOUND: i64 = 404;
    /// Pull request expired before messages arrived.
    pub const REQUEST_TIMEOUT: i64 = 408;
    /// Pull request conflicts with consumer state (e.g. exceeded max waiting).
    pub const CONFLICT: i64 = 409;
    /// Server-side failure.
    pub const SERVER_ERROR: i64 = 500;
    /// No responders / JetStream not available.
    pub const SERVICE_UNAVAILABLE: i64 = 503;
    /// [`SERVICE_UNAVAILABLE`] as it appears in a `Status` header.
    pub const SERVICE_UNAVAILABLE_TEXT: &str = "503";
}

const TABLE: &[(i64, ErrorKind)] = &[
    (status::SERVICE_UNAVAILABLE, ErrorKind::ServiceUnavailable),
    (status::SERVER_ERROR, ErrorKind::Server),
    (status::NOT_FOUND, ErrorKind::NotFound),
    (status::BAD_REQUEST, ErrorKind::BadRequest),
];

/// Map a status code to the kind a structured error body classifies as.
///
/// Total: every code outside the table maps to [`ErrorKind::Api`].
pub fn kind_for_status(code: i64) -> ErrorKind {
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Api)
}

/// `true` if `code` has a dedicated kind rather than the generic fallback.
pub fn is_registered(code: i64) -> bool {
    TABLE.iter().any(|(c, _)| *c == code)
}
