// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz structured error body decoding and classification.
//!
//! Verifies:
//! 1. Decoding arbitrary text as a body or reply never panics.
//! 2. Every decoded body classifies with all fields preserved.
//! 3. Rendering is stable and names the kind.
//! 4. JetStreamErrorDto round-trips through JSON.
#![no_main]
use jetstream_error::{ApiErrorBody, ApiResponse, JetStreamError, JetStreamErrorDto, classify_body};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1: reply decoding never panics ---
    if let Ok(resp) = ApiResponse::from_json(s) {
        let _ = resp.error();
    }

    let Ok(body) = ApiErrorBody::from_json(s) else {
        return;
    };

    // --- Property 2: fields survive classification ---
    let err = classify_body(&body);
    assert_eq!(err.code(), Some(body.code));
    assert_eq!(err.err_code(), body.err_code);
    assert_eq!(err.description(), body.description.as_deref());
    assert_eq!(err.stream(), body.stream.as_deref());
    assert_eq!(err.seq(), body.seq);

    // --- Property 3: rendering ---
    let rendered = err.to_string();
    assert_eq!(rendered, err.to_string());
    assert!(rendered.starts_with(&format!("nats: {}: ", err.name())));

    // --- Property 4: DTO JSON round-trip ---
    let dto = JetStreamErrorDto::from(&err);
    let json = serde_json::to_string(&dto).expect("dto must serialize");
    let rt: JetStreamErrorDto = serde_json::from_str(&json).expect("dto round-trip must succeed");
    assert_eq!(JetStreamError::from(rt), err);
});
