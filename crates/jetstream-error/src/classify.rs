// SPDX-License-Identifier: MIT OR Apache-2.0
//! Turning server replies into typed errors.

use crate::registry::{DESCRIPTION_HEADER, STATUS_HEADER, kind_for_status, status};
use crate::{ApiErrorBody, ClassifierConfig, ErrorKind, JetStreamError};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::debug;

const TARGET: &str = "jetstream.errors";

// ---------------------------------------------------------------------------
// ResponseHeaders
// ---------------------------------------------------------------------------

/// Read access to the headers of a reply message.
pub trait ResponseHeaders {
    /// Value of the header named exactly `name`.
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of the first header whose name equals `name` ignoring ASCII case.
    fn header_ignore_case(&self, name: &str) -> Option<&str>;
}

impl ResponseHeaders for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn header_ignore_case(&self, name: &str) -> Option<&str> {
        find_ignore_case(self.iter(), name)
    }
}

impl<S: BuildHasher> ResponseHeaders for HashMap<String, String, S> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.header(name).or_else(|| find_ignore_case(self.iter(), name))
    }
}

impl ResponseHeaders for [(String, String)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn header_ignore_case(&self, name: &str) -> Option<&str> {
        find_ignore_case(self.iter().map(|(k, v)| (k, v)), name)
    }
}

impl ResponseHeaders for Vec<(String, String)> {
    fn header(&self, name: &str) -> Option<&str> {
        self.as_slice().header(name)
    }

    fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.as_slice().header_ignore_case(name)
    }
}

fn find_ignore_case<'a>(
    mut entries: impl Iterator<Item = (&'a String, &'a String)>,
    name: &str,
) -> Option<&'a str> {
    entries
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

struct HeaderNames<'a> {
    status: &'a str,
    description: &'a str,
    ignore_case: bool,
}

impl HeaderNames<'_> {
    fn lookup<'h, H: ResponseHeaders + ?Sized>(&self, headers: &'h H, name: &str) -> Option<&'h str> {
        if self.ignore_case {
            headers.header_ignore_case(name)
        } else {
            headers.header(name)
        }
    }
}

const WIRE_HEADERS: HeaderNames<'static> = HeaderNames {
    status: STATUS_HEADER,
    description: DESCRIPTION_HEADER,
    ignore_case: false,
};

fn classify_with<H: ResponseHeaders + ?Sized>(
    names: &HeaderNames<'_>,
    headers: Option<&H>,
) -> JetStreamError {
    let Some(headers) = headers else {
        debug!(target: TARGET, "reply carried no headers");
        return JetStreamError::new(ErrorKind::Api);
    };

    // 503 is matched on the header text; only other statuses are parsed.
    let raw_status = names.lookup(headers, names.status).map(str::trim);
    if raw_status == Some(status::SERVICE_UNAVAILABLE_TEXT) {
        debug!(target: TARGET, kind = "ServiceUnavailableError", "classified reply headers");
        return JetStreamError::new(ErrorKind::ServiceUnavailable);
    }
    let code = raw_status.and_then(|s| s.parse::<i64>().ok());
    if code.is_none() {
        debug!(target: TARGET, status = ?raw_status, "reply status missing or not numeric");
    }

    let description = names.lookup(headers, names.description).map(str::to_owned);
    debug!(target: TARGET, kind = "APIError", ?code, "classified reply headers");
    JetStreamError::from_status(ErrorKind::Api, code, description)
}

/// Classify the headers of an inline status reply.
///
/// * No headers → generic [`ErrorKind::Api`] with nothing set.
/// * `Status: 503` → [`ErrorKind::ServiceUnavailable`] with nothing set.
/// * Anything else → generic [`ErrorKind::Api`] with `code` from `Status`
///   (unset if absent or not numeric) and `description` from `Description`.
pub fn classify_headers<H: ResponseHeaders + ?Sized>(headers: Option<&H>) -> JetStreamError {
    classify_with(&WIRE_HEADERS, headers)
}

/// Classify a structured error body.
///
/// The code selects the kind through [`kind_for_status`]; every field of the
/// body is carried over unchanged.
pub fn classify_body(body: &ApiErrorBody) -> JetStreamError {
    let kind = kind_for_status(body.code);
    if kind == ErrorKind::Api {
        debug!(target: TARGET, code = body.code, "unregistered status code, using generic kind");
    }
    debug!(target: TARGET, kind = kind.name(), code = body.code, err_code = ?body.err_code, "classified error body");
    JetStreamError::from_api_body(kind, body)
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classification with configurable header names.
///
/// `Classifier::default()` behaves exactly like the free functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Classifier using `config`.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Like [`classify_headers`] with the configured header names.
    pub fn classify_headers<H: ResponseHeaders + ?Sized>(&self, headers: Option<&H>) -> JetStreamError {
        let names = HeaderNames {
            status: self.config.status_header(),
            description: self.config.description_header(),
            ignore_case: self.config.case_insensitive(),
        };
        classify_with(&names, headers)
    }

    /// Same as [`classify_body`]; bodies do not depend on configuration.
    pub fn classify_body(&self, body: &ApiErrorBody) -> JetStreamError {
        classify_body(body)
    }
}
