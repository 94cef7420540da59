//! ObjectStorageService: translates object-level intents into store
//! commands for one fixed bucket.
//!
//! Requests are shaped here and handed to the injected
//! [`ObjectStoreClient`]. Nothing is retried, cached or translated: client
//! failures come back to the caller as-is.

use crate::{
    models::{
        command::{
            DeleteObjectInput, GetObjectInput, HeadObjectInput, ListObjectVersionsInput,
            PutObjectInput, StorageCommand,
        },
        object::{
            DeleteObjectOutput, GetObjectOutput, ObjectMetadata, ObjectVersion, PutObjectOutput,
        },
    },
    services::client::{ObjectStoreClient, StorageError, StorageResult},
};
use bytes::Bytes;
use serde::Deserialize;
use std::{fmt, sync::Arc, time::Duration};
use tracing::debug;

/// Presigned URL lifetime in seconds when the caller does not choose one.
pub const DEFAULT_EXPIRES_IN: u64 = 300;

/// Addresses one object, optionally one version of it.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRequest {
    pub file_path: String,
    pub version_id: Option<String>,
}

impl ObjectRequest {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            version_id: None,
        }
    }

    #[cfg(test)]
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest {
    pub file_path: String,
    pub version_id: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresignOptions {
    /// Seconds; `None` means [`DEFAULT_EXPIRES_IN`].
    pub expires_in: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct UploadRequest {
    pub file_path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct ObjectStorageService {
    client: Arc<dyn ObjectStoreClient>,
    bucket: String,
}

impl fmt::Debug for ObjectStorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorageService")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl ObjectStorageService {
    /// Bind `client` to `bucket`. Every operation of this instance targets
    /// that bucket.
    pub fn new(client: Arc<dyn ObjectStoreClient>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Empty keys would address the whole bucket; refuse them locally.
    fn require_path(file_path: &str) -> StorageResult<()> {
        if file_path.is_empty() {
            return Err(StorageError::MissingFilePath);
        }
        Ok(())
    }

    pub fn delete_input(&self, request: ObjectRequest) -> DeleteObjectInput {
        DeleteObjectInput {
            bucket: self.bucket.clone(),
            key: request.file_path,
            version_id: request.version_id,
        }
    }

    pub fn head_input(&self, request: ObjectRequest) -> HeadObjectInput {
        HeadObjectInput {
            bucket: self.bucket.clone(),
            key: request.file_path,
            version_id: request.version_id,
        }
    }

    pub fn list_versions_input(&self, file_path: impl Into<String>) -> ListObjectVersionsInput {
        ListObjectVersionsInput {
            bucket: self.bucket.clone(),
            prefix: file_path.into(),
        }
    }

    pub fn read_input(&self, request: ObjectRequest) -> GetObjectInput {
        GetObjectInput {
            bucket: self.bucket.clone(),
            key: request.file_path,
            version_id: request.version_id,
        }
    }

    /// Delete the object, or only `version_id` of it when given.
    pub async fn delete_object(&self, request: ObjectRequest) -> StorageResult<DeleteObjectOutput> {
        Self::require_path(&request.file_path)?;
        debug!(
            bucket = %self.bucket,
            key = %request.file_path,
            version_id = ?request.version_id,
            "delete object"
        );
        self.client.delete_object(self.delete_input(request)).await
    }

    /// Metadata only; no content is transferred.
    pub async fn head_object(&self, request: ObjectRequest) -> StorageResult<ObjectMetadata> {
        Self::require_path(&request.file_path)?;
        debug!(
            bucket = %self.bucket,
            key = %request.file_path,
            version_id = ?request.version_id,
            "head object"
        );
        self.client.head_object(self.head_input(request)).await
    }

    /// List every version whose key starts with `file_path`.
    ///
    /// Any `version_id` on the request is ignored. Ordering is whatever the
    /// store returns.
    pub async fn list_object_version(
        &self,
        request: ObjectRequest,
    ) -> StorageResult<Vec<ObjectVersion>> {
        Self::require_path(&request.file_path)?;
        debug!(bucket = %self.bucket, prefix = %request.file_path, "list object versions");
        self.client
            .list_object_versions(self.list_versions_input(request.file_path))
            .await
    }

    /// Read the latest object, or a specific version when given.
    pub async fn read_object(&self, request: ObjectRequest) -> StorageResult<GetObjectOutput> {
        Self::require_path(&request.file_path)?;
        debug!(
            bucket = %self.bucket,
            key = %request.file_path,
            version_id = ?request.version_id,
            "read object"
        );
        self.client.get_object(self.read_input(request)).await
    }

    /// Sign an already-built command without executing it.
    pub async fn presign_url(
        &self,
        command: &StorageCommand,
        options: PresignOptions,
    ) -> StorageResult<String> {
        let expires_in = options.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
        debug!(
            bucket = %command.bucket(),
            key = %command.key(),
            expires_in,
            "presign command"
        );
        self.client
            .presign(command, Duration::from_secs(expires_in))
            .await
    }

    /// Presigned download link for the latest object or one version.
    pub async fn read_signed_url(&self, request: SignedUrlRequest) -> StorageResult<String> {
        Self::require_path(&request.file_path)?;
        let command = StorageCommand::Read(self.read_input(ObjectRequest {
            file_path: request.file_path,
            version_id: request.version_id,
        }));
        self.presign_url(
            &command,
            PresignOptions {
                expires_in: request.expires_in,
            },
        )
        .await
    }

    /// Store `body` under `file_path` in a single request.
    pub async fn upload_object(&self, request: UploadRequest) -> StorageResult<PutObjectOutput> {
        Self::require_path(&request.file_path)?;
        debug!(
            bucket = %self.bucket,
            key = %request.file_path,
            size = request.body.len(),
            "upload object"
        );
        self.client
            .put_object(PutObjectInput {
                bucket: self.bucket.clone(),
                key: request.file_path,
                content_type: request.content_type,
                body: request.body,
            })
            .await
    }
}
