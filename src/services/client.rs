//! The object-store capability consumed by [`ObjectStorageService`].
//!
//! Transports implement [`ObjectStoreClient`]; the adapter only shapes
//! requests and forwards whatever the client returns, errors included.
//!
//! [`ObjectStorageService`]: crate::services::object_storage::ObjectStorageService

use crate::models::{
    command::{
        DeleteObjectInput, GetObjectInput, HeadObjectInput, ListObjectVersionsInput,
        PutObjectInput, StorageCommand,
    },
    object::{DeleteObjectOutput, GetObjectOutput, ObjectMetadata, ObjectVersion, PutObjectOutput},
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object `{key}` not found in bucket `{bucket}`")]
    NotFound { bucket: String, key: String },
    #[error("file path is required")]
    MissingFilePath,
    #[error("object store error {code}: {message}")]
    Transport { code: String, message: String },
    #[error("unable to sign request: {0}")]
    Signing(String),
    #[error("presigned request rejected: {0}")]
    Forbidden(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Executes store commands against one backend and signs them into URLs.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    async fn delete_object(&self, input: DeleteObjectInput) -> StorageResult<DeleteObjectOutput>;

    async fn head_object(&self, input: HeadObjectInput) -> StorageResult<ObjectMetadata>;

    /// All versions of every key starting with `input.prefix`, in store order.
    async fn list_object_versions(
        &self,
        input: ListObjectVersionsInput,
    ) -> StorageResult<Vec<ObjectVersion>>;

    async fn get_object(&self, input: GetObjectInput) -> StorageResult<GetObjectOutput>;

    async fn put_object(&self, input: PutObjectInput) -> StorageResult<PutObjectOutput>;

    /// Produce a URL that lets its holder perform `command` until
    /// `expires_in` elapses. Must not execute the command.
    async fn presign(&self, command: &StorageCommand, expires_in: Duration)
    -> StorageResult<String>;
}
