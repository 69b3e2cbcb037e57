// SPDX-License-Identifier: MIT OR Apache-2.0
//! Benchmarks for the classification and rendering hot paths.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::BTreeMap;

use jetstream_taxonomy::{ApiErrorBody, ApiResponse, JetStreamError, classify_body, classify_headers};

fn sample_body() -> ApiErrorBody {
    ApiErrorBody::new(404)
        .with_err_code(10_059)
        .with_description("stream not found")
        .with_stream("ORDERS")
}

fn sample_headers() -> BTreeMap<String, String> {
    let mut h = BTreeMap::new();
    h.insert("Status".to_owned(), "408".to_owned());
    h.insert("Description".to_owned(), "Request Timeout".to_owned());
    h
}

fn bench_classify_body(c: &mut Criterion) {
    let body = sample_body();
    c.bench_function("classify_body", |b| b.iter(|| classify_body(black_box(&body))));
}

fn bench_classify_headers(c: &mut Criterion) {
    let headers = sample_headers();
    c.bench_function("classify_headers", |b| {
        b.iter(|| classify_headers(Some(black_box(&headers))))
    });
}

fn bench_decode_reply(c: &mut Criterion) {
    let reply = r#"{"type":"io.nats.jetstream.api.v1.stream_info_response","error":{"code":404,"err_code":10059,"description":"stream not found"}}"#;
    c.bench_function("decode_and_classify_reply", |b| {
        b.iter(|| ApiResponse::from_json(black_box(reply)).map(|r| r.error()))
    });
}

fn bench_render(c: &mut Criterion) {
    let api = classify_body(&sample_body());
    let gap = JetStreamError::consumer_sequence_mismatch(10, 5, 8);
    c.bench_function("render_api_error", |b| b.iter(|| black_box(&api).to_string()));
    c.bench_function("render_sequence_mismatch", |b| {
        b.iter(|| black_box(&gap).to_string())
    });
}

criterion_group!(
    benches,
    bench_classify_body,
    bench_classify_headers,
    bench_decode_reply,
    bench_render
);
criterion_main!(benches);
