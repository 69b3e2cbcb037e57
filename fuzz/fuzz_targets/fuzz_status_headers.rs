// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz inline status header classification.
//!
//! Input is split on newlines into `Name: value` pairs. Classification must
//! never panic and must always yield an API-family error.
#![no_main]
use jetstream_error::{ErrorKind, classify_headers};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let headers: Vec<(String, String)> = s
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect();

    let err = classify_headers(Some(&headers));
    assert!(matches!(
        err.kind(),
        ErrorKind::Api | ErrorKind::ServiceUnavailable
    ));
    if err.kind() == ErrorKind::ServiceUnavailable {
        assert!(err.code().is_none());
    }
    let _ = err.to_string();
});
