// SPDX-License-Identifier: MIT OR Apache-2.0
//! Facade over [`jetstream_error`], the typed error taxonomy for JetStream,
//! Key-Value and Object-Store clients.
#![deny(unsafe_code)]

pub use jetstream_error::*;
