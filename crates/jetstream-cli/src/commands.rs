// SPDX-License-Identifier: MIT OR Apache-2.0
//! Subcommand implementations for `jserr`.

use anyhow::{Context, Result, bail};
use jetstream_error::{
    ApiErrorBody, ApiResponse, Classifier, ErrorKind, JetStreamError, JetStreamErrorDto,
};
use serde_json::Value as JsonValue;
use std::fmt::Write as _;
use tracing::debug;

/// Classify a structured error body or a full API reply.
///
/// An object with a top-level `code` is a bare error body; anything else is
/// decoded as a reply and must carry an `error` member.
pub fn classify_body(input: &str) -> Result<JetStreamError> {
    let value: JsonValue = serde_json::from_str(input).context("input is not valid JSON")?;
    if value.get("code").is_some() {
        let body = ApiErrorBody::from_value(value)?;
        debug!(target: "jetstream.cli", code = body.code, "decoded error body");
        return Ok(body.classify());
    }
    let reply = ApiResponse::from_json(input)?;
    match reply.error() {
        Some(err) => {
            debug!(target: "jetstream.cli", code = ?err.code(), "decoded API reply");
            Ok(err)
        }
        None => bail!("reply carries no error"),
    }
}

/// Split a `NAME=VALUE` header argument.
pub fn parse_header(arg: &str) -> Result<(String, String)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("header '{arg}' must be NAME=VALUE");
    };
    if name.trim().is_empty() {
        bail!("header '{arg}' has an empty name");
    }
    Ok((name.trim().to_owned(), value.to_owned()))
}

/// Classify reply headers. An empty list means the reply had no headers.
pub fn classify_headers(classifier: &Classifier, args: &[String]) -> Result<JetStreamError> {
    if args.is_empty() {
        return Ok(classifier.classify_headers::<Vec<(String, String)>>(None));
    }
    let headers = args
        .iter()
        .map(|a| parse_header(a))
        .collect::<Result<Vec<_>>>()?;
    Ok(classifier.classify_headers(Some(&headers)))
}

/// Look up a kind by its snake_case tag or its kind name.
pub fn parse_kind(s: &str) -> Result<ErrorKind> {
    ErrorKind::ALL
        .iter()
        .copied()
        .find(|k| k.as_str() == s || k.name() == s)
        .with_context(|| format!("unknown error kind '{s}'"))
}

/// Sequence numbers for `render consumer_sequence_mismatch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sequences {
    /// Stream sequence to restart from.
    pub resume: Option<u64>,
    /// Consumer sequence received.
    pub current: Option<u64>,
    /// Consumer sequence last delivered.
    pub last: Option<u64>,
}

impl Sequences {
    fn is_empty(&self) -> bool {
        self.resume.is_none() && self.current.is_none() && self.last.is_none()
    }
}

/// Build a locally raised error of `kind`.
///
/// `description` becomes the trailing message of `key_not_found`; sequences
/// are only accepted for `consumer_sequence_mismatch`, which needs all three.
pub fn render(
    kind: &str,
    description: Option<String>,
    sequences: Sequences,
) -> Result<JetStreamError> {
    let kind = parse_kind(kind)?;
    if kind == ErrorKind::ConsumerSequenceMismatch {
        let (Some(resume), Some(current), Some(last)) =
            (sequences.resume, sequences.current, sequences.last)
        else {
            bail!("{} needs --resume, --current and --last", kind.as_str());
        };
        return Ok(JetStreamError::consumer_sequence_mismatch(resume, current, last));
    }
    if !sequences.is_empty() {
        bail!(
            "--resume, --current and --last only apply to {}",
            ErrorKind::ConsumerSequenceMismatch.as_str()
        );
    }
    if kind == ErrorKind::KeyNotFound {
        return Ok(JetStreamError::key_not_found(None, None, description));
    }
    let err = JetStreamError::new(kind);
    Ok(match description {
        Some(d) => err.with_description(d),
        None => err,
    })
}

/// Text or JSON output for a classified error.
pub fn format_error(err: &JetStreamError, json: bool) -> Result<String> {
    if json {
        let dto = JetStreamErrorDto::from(err);
        Ok(serde_json::to_string_pretty(&dto)?)
    } else {
        Ok(err.to_string())
    }
}

/// One line per kind: tag, name, capability tags.
pub fn kinds_table() -> String {
    let mut out = String::new();
    for kind in ErrorKind::ALL {
        let caps: Vec<&str> = kind.capabilities().iter().map(|c| c.as_str()).collect();
        let _ = writeln!(
            out,
            "{:<28} {:<32} {}",
            kind.as_str(),
            kind.name(),
            caps.join(",")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_body() {
        let err = classify_body(r#"{"code":404,"description":"consumer not found"}"#).unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn envelope_body() {
        let err = classify_body(r#"{"type":"t","error":{"code":500}}"#).unwrap();
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn reply_without_error() {
        let err = classify_body(r#"{"type":"t"}"#).unwrap_err();
        assert_eq!(err.to_string(), "reply carries no error");
    }

    #[test]
    fn reply_with_null_error() {
        let err = classify_body(
            r#"{"type":"io.nats.jetstream.api.v1.stream_info_response","error":null}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "reply carries no error");
    }

    #[test]
    fn reply_agrees_with_api_response() {
        let reply = r#"{"type":"t","error":{"code":404,"err_code":10014,"stream":"S"}}"#;
        let expected = ApiResponse::from_json(reply).unwrap().error().unwrap();
        assert_eq!(classify_body(reply).unwrap(), expected);
    }

    #[test]
    fn malformed_error_member_is_rejected() {
        let err = classify_body(r#"{"type":"t","error":"boom"}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid API error body"), "{err}");
    }

    #[test]
    fn header_parsing() {
        assert_eq!(
            parse_header("Status=503").unwrap(),
            ("Status".to_owned(), "503".to_owned())
        );
        assert_eq!(
            parse_header("Description=a=b").unwrap(),
            ("Description".to_owned(), "a=b".to_owned())
        );
        assert!(parse_header("Status").is_err());
        assert!(parse_header("=x").is_err());
    }

    #[test]
    fn no_headers() {
        let err = classify_headers(&Classifier::default(), &[]).unwrap();
        assert_eq!(err, JetStreamError::new(ErrorKind::Api));
    }

    #[test]
    fn kinds_by_tag_or_name() {
        assert_eq!(parse_kind("no_keys").unwrap(), ErrorKind::NoKeys);
        assert_eq!(parse_kind("NoKeysError").unwrap(), ErrorKind::NoKeys);
        assert!(parse_kind("nope").is_err());
    }

    #[test]
    fn render_with_description() {
        let err = render("bad_object_meta", Some("truncated".into()), Sequences::default()).unwrap();
        assert_eq!(err.to_string(), "nats: JetStream.BadObjectMetaError truncated");
    }

    #[test]
    fn render_key_not_found_appends_description() {
        let err = render("key_not_found", Some("bucket closed".into()), Sequences::default())
            .unwrap();
        assert_eq!(err.to_string(), "nats: key not found: bucket closed");
        assert_eq!(err.message(), Some("bucket closed"));
    }

    #[test]
    fn render_sequence_mismatch() {
        let seqs = Sequences {
            resume: Some(10),
            current: Some(5),
            last: Some(8),
        };
        let err = render("consumer_sequence_mismatch", None, seqs).unwrap();
        assert_eq!(
            err.to_string(),
            "nats: sequence mismatch for consumer at sequence 5 (3 sequences behind), \
             should restart consumer from stream sequence 10"
        );
    }

    #[test]
    fn render_sequence_mismatch_needs_all_sequences() {
        let seqs = Sequences {
            resume: Some(10),
            ..Default::default()
        };
        let err = render("consumer_sequence_mismatch", None, seqs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "consumer_sequence_mismatch needs --resume, --current and --last"
        );
    }

    #[test]
    fn render_rejects_sequences_for_other_kinds() {
        let seqs = Sequences {
            last: Some(1),
            ..Default::default()
        };
        assert!(render("no_keys", None, seqs).is_err());
    }

    #[test]
    fn json_output() {
        let err = JetStreamError::new(ErrorKind::FetchTimeout);
        let out = format_error(&err, true).unwrap();
        let v: JsonValue = serde_json::from_str(&out).unwrap();
        assert_eq!(v["kind"], "fetch_timeout");
        assert_eq!(v["message"], "nats: fetch timeout");
        assert_eq!(v["capabilities"], serde_json::json!(["timeout"]));
    }

    #[test]
    fn table_lists_all_kinds() {
        let table = kinds_table();
        assert_eq!(table.lines().count(), ErrorKind::ALL.len());
        assert!(table.contains("KeyDeletedError"));
    }
}
