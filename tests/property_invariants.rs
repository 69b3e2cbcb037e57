// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property-based tests for classification and rendering invariants.

use std::collections::BTreeMap;

use jetstream_taxonomy::registry::kind_for_status;
use jetstream_taxonomy::{ApiErrorBody, ErrorKind, JetStreamError, classify_body, classify_headers};
use proptest::prelude::*;

/// Strategy: an error body with any subset of optional fields.
fn any_body() -> impl Strategy<Value = ApiErrorBody> {
    (
        prop_oneof![Just(400i64), Just(404), Just(500), Just(503), any::<i64>()],
        prop::option::of(any::<i64>()),
        prop::option::of("[ -~]{0,24}"),
        prop::option::of("[A-Z_]{1,12}"),
        prop::option::of(any::<u64>()),
    )
        .prop_map(|(code, err_code, description, stream, seq)| ApiErrorBody {
            code,
            err_code,
            description,
            stream,
            seq,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn registry_is_total(code in any::<i64>()) {
        let kind = kind_for_status(code);
        let expected = match code {
            503 => ErrorKind::ServiceUnavailable,
            500 => ErrorKind::Server,
            404 => ErrorKind::NotFound,
            400 => ErrorKind::BadRequest,
            _ => ErrorKind::Api,
        };
        prop_assert_eq!(kind, expected);
    }

    #[test]
    fn body_fields_are_preserved(body in any_body()) {
        let err = classify_body(&body);
        prop_assert_eq!(err.code(), Some(body.code));
        prop_assert_eq!(err.err_code(), body.err_code);
        prop_assert_eq!(err.description(), body.description.as_deref());
        prop_assert_eq!(err.stream(), body.stream.as_deref());
        prop_assert_eq!(err.seq(), body.seq);
        prop_assert!(err.is_api());
    }

    #[test]
    fn api_rendering_is_fixed_shape(body in any_body()) {
        let err = classify_body(&body);
        let rendered = err.to_string();
        let expected_prefix = format!("nats: {}: code={} err_code=", err.name(), body.code);
        prop_assert!(rendered.starts_with(&expected_prefix));
        match body.err_code {
            Some(ec) => {
                let needle = format!("err_code={ec} ");
                prop_assert!(rendered.contains(&needle));
            }
            None => prop_assert!(rendered.contains("err_code=None ")),
        }
        match &body.description {
            Some(d) => {
                let suffix = format!("description='{d}'");
                prop_assert!(rendered.ends_with(&suffix));
            }
            None => prop_assert!(rendered.ends_with("description='None'")),
        }
    }

    #[test]
    fn rendering_is_idempotent(body in any_body()) {
        let err = classify_body(&body);
        prop_assert_eq!(err.to_string(), err.to_string());
    }

    #[test]
    fn header_503_ignores_description(desc in "[ -~]{0,40}") {
        let mut h = BTreeMap::new();
        h.insert("Status".to_owned(), "503".to_owned());
        h.insert("Description".to_owned(), desc);
        let err = classify_headers(Some(&h));
        prop_assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        prop_assert!(err.code().is_none());
    }

    #[test]
    fn header_status_round_trips(code in 100i64..1000, desc in "[a-zA-Z ]{0,20}") {
        prop_assume!(code != 503);
        let mut h = BTreeMap::new();
        h.insert("Status".to_owned(), code.to_string());
        h.insert("Description".to_owned(), desc.clone());
        let err = classify_headers(Some(&h));
        prop_assert_eq!(err.kind(), ErrorKind::Api);
        prop_assert_eq!(err.code(), Some(code));
        prop_assert_eq!(err.description(), Some(desc.as_str()));
    }

    #[test]
    fn sequence_gap_is_last_minus_current(
        resume in any::<u64>(),
        current in 0u64..1_000_000,
        last in 0u64..1_000_000,
    ) {
        let err = JetStreamError::consumer_sequence_mismatch(resume, current, last);
        let gap = i128::from(last) - i128::from(current);
        let expected = format!(
            "nats: sequence mismatch for consumer at sequence {current} ({gap} sequences behind), \
             should restart consumer from stream sequence {resume}"
        );
        prop_assert_eq!(err.to_string(), expected);
    }
}
