// SPDX-License-Identifier: MIT OR Apache-2.0
//! Key-Value payloads attached to key lookup errors.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum history depth a Key-Value bucket may retain per key.
pub const KV_MAX_HISTORY: u32 = 64;

/// Operation recorded on a Key-Value entry.
///
/// Serialises to the wire marker carried in the `KV-Operation` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum KvOperation {
    /// Value write.
    #[serde(rename = "PUT")]
    Put,
    /// Delete marker.
    #[serde(rename = "DEL")]
    Delete,
    /// Purge marker; removes prior history.
    #[serde(rename = "PURGE")]
    Purge,
}

impl KvOperation {
    /// Wire marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Delete => "DEL",
            Self::Purge => "PURGE",
        }
    }

    /// Parse a wire marker. Unknown markers yield `None`.
    pub fn parse(marker: &str) -> Option<Self> {
        match marker.trim() {
            "PUT" => Some(Self::Put),
            "DEL" => Some(Self::Delete),
            "PURGE" => Some(Self::Purge),
            _ => None,
        }
    }

    /// `true` for delete and purge markers.
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Delete | Self::Purge)
    }
}

impl fmt::Display for KvOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the Key-Value entry a lookup error was raised for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KvEntry {
    /// Bucket name.
    pub bucket: String,
    /// Key.
    pub key: String,
    /// Raw value bytes, if the entry carried any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<u8>>,
    /// Stream sequence of this revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    /// Distance from the latest revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<u64>,
    /// Server timestamp of the revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Operation recorded on the revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<KvOperation>,
}

impl KvEntry {
    /// Entry for `key` in `bucket` with every optional field unset.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Set the revision.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Set the operation.
    pub fn with_operation(mut self, op: KvOperation) -> Self {
        self.operation = Some(op);
        self
    }

    /// Set the value bytes.
    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(value.into());
        self
    }
}
