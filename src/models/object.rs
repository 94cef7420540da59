//! Results returned by the object store for a single object or version.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::Serialize;
use std::{fmt, io, pin::Pin};

/// Streaming object content.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Metadata describing one object revision, without its content.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Object key within the bucket.
    pub key: String,

    /// Revision this metadata belongs to, when the store is versioned.
    pub version_id: Option<String>,

    /// Content type (MIME type).
    pub content_type: Option<String>,

    /// Size in bytes.
    pub size_bytes: u64,

    /// Content checksum as reported by the store.
    pub etag: Option<String>,

    pub last_modified: DateTime<Utc>,
}

/// One entry of a version listing.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectVersion {
    pub key: String,
    pub version_id: String,
    pub is_latest: bool,

    /// Delete markers carry no content; size and etag are empty.
    pub is_delete_marker: bool,
    pub size_bytes: u64,
    pub etag: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// Content read: metadata plus a body stream.
pub struct GetObjectOutput {
    pub metadata: ObjectMetadata,
    pub body: ByteStream,
}

impl fmt::Debug for GetObjectOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetObjectOutput")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteObjectOutput {
    /// Version removed, or the id of the delete marker that was created.
    pub version_id: Option<String>,
    pub delete_marker: bool,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PutObjectOutput {
    pub version_id: Option<String>,
    pub etag: Option<String>,
}
