//! Snapshot record and its persisted JSON shape.
//!
//! ```json
//! {
//!   "snapshot_id": "2026-10-16T08:30:00.123456Z",
//!   "generated_at": "2026-10-16T08:30:00.123456789Z",
//!   "source_versions": {"docs_repo": "4f1c2e9"},
//!   "page_manifest": {
//!     "guides/quickstart.md": {
//!       "content_hash": "…",
//!       "token_count": 812,
//!       "title": "Quickstart",
//!       "tags": ["guide"]
//!     }
//!   }
//! }
//! ```
//!
//! Fields are private: a `Snapshot` is read-only once constructed.

use crate::errors::{ExError, ExErrorKind, Result};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-page metadata recorded in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMetadata {
    /// Hex SHA256 of the normalized page content
    pub content_hash: String,
    pub token_count: u64,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Immutable metadata summary of one build's page set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    snapshot_id: String,
    generated_at: DateTime<Utc>,
    #[serde(default)]
    source_versions: BTreeMap<String, String>,
    #[serde(deserialize_with = "deserialize_unique_manifest")]
    page_manifest: BTreeMap<String, PageMetadata>,
}

impl Snapshot {
    pub fn new(
        snapshot_id: impl Into<String>,
        generated_at: DateTime<Utc>,
        source_versions: BTreeMap<String, String>,
        page_manifest: BTreeMap<String, PageMetadata>,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            generated_at,
            source_versions,
            page_manifest,
        }
    }

    pub fn id(&self) -> &str {
        &self.snapshot_id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn source_versions(&self) -> &BTreeMap<String, String> {
        &self.source_versions
    }

    pub fn page_manifest(&self) -> &BTreeMap<String, PageMetadata> {
        &self.page_manifest
    }

    pub fn page(&self, path: &str) -> Option<&PageMetadata> {
        self.page_manifest.get(path)
    }

    /// Page paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.page_manifest.keys().map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.page_manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page_manifest.is_empty()
    }

    /// Encode as the persisted JSON record.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("encode_snapshot")
                .with_snapshot_id(&self.snapshot_id)
                .with_message(e.to_string())
        })
    }

    /// Decode a persisted JSON record.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSnapshot` when the bytes are not a valid snapshot
    /// record: invalid JSON, missing fields, an empty id, or a page path that
    /// appears twice in `page_manifest`.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_slice(bytes).map_err(|e| {
            ExError::new(ExErrorKind::MalformedSnapshot)
                .with_op("decode_snapshot")
                .with_message(format!("snapshot record does not parse: {}", e))
        })?;

        if snapshot.snapshot_id.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::MalformedSnapshot)
                .with_op("decode_snapshot")
                .with_message("snapshot record has an empty `snapshot_id`"));
        }

        Ok(snapshot)
    }
}

/// Reject repeated page paths instead of letting the last entry win.
fn deserialize_unique_manifest<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, PageMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ManifestVisitor;

    impl<'de> Visitor<'de> for ManifestVisitor {
        type Value = BTreeMap<String, PageMetadata>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from page path to page metadata")
        }

        fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut manifest = BTreeMap::new();
            while let Some((path, meta)) = access.next_entry::<String, PageMetadata>()? {
                if manifest.contains_key(&path) {
                    return Err(de::Error::custom(format!(
                        "duplicate page path `{}` in page_manifest",
                        path
                    )));
                }
                manifest.insert(path, meta);
            }
            Ok(manifest)
        }
    }

    deserializer.deserialize_map(ManifestVisitor)
}
