//! MemoryStore, a versioned in-process [`ObjectStoreClient`].
//!
//! Backs local runs of the gateway and tests that need real store
//! behaviour. Versioning is always on:
//! - every put appends a new version (uuid v4 id, md5 etag)
//! - delete without a version appends a delete marker
//! - delete with a version removes that version permanently
//!
//! Presigned URLs come from the shared [`UrlSigner`], so the gateway's
//! `/presigned` route can verify and execute them.

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
    services::{
        client::{ObjectStoreClient, StorageError, StorageResult},
        signer::UrlSigner,
    },
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, io::Cursor, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug)]
struct StoredVersion {
    version_id: String,
    content_type: Option<String>,
    body: Bytes,
    etag: Option<String>,
    last_modified: DateTime<Utc>,
    delete_marker: bool,
}

impl StoredVersion {
    fn metadata(&self, key: &str) -> ObjectMetadata {
        ObjectMetadata {
            key: key.to_string(),
            version_id: Some(self.version_id.clone()),
            content_type: self.content_type.clone(),
            size_bytes: self.body.len() as u64,
            etag: self.etag.clone(),
            last_modified: self.last_modified,
        }
    }
}

pub struct MemoryStore {
    bucket: String,
    signer: Arc<UrlSigner>,
    /// Versions per key, oldest first.
    objects: RwLock<BTreeMap<String, Vec<StoredVersion>>>,
}

impl MemoryStore {
    /// Serve `bucket`, issuing presigned URLs through `signer`.
    pub fn new(bucket: impl Into<String>, signer: Arc<UrlSigner>) -> Self {
        Self {
            bucket: bucket.into(),
            signer,
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    fn ensure_bucket(&self, bucket: &str) -> StorageResult<()> {
        if bucket == self.bucket {
            Ok(())
        } else {
            Err(StorageError::Transport {
                code: "NoSuchBucket".into(),
                message: format!("bucket `{}` does not exist", bucket),
            })
        }
    }

    fn not_found(&self, key: &str) -> StorageError {
        StorageError::NotFound {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        }
    }

    /// Resolve the version a read addresses. Delete markers are not readable.
    fn find_version(
        &self,
        versions: Option<&Vec<StoredVersion>>,
        key: &str,
        version_id: Option<&str>,
    ) -> StorageResult<StoredVersion> {
        let found = versions.and_then(|versions| match version_id {
            Some(id) => versions.iter().find(|v| v.version_id == id),
            None => versions.last(),
        });
        match found {
            Some(version) if !version.delete_marker => Ok(version.clone()),
            _ => Err(self.not_found(key)),
        }
    }
}

#[async_trait]
impl ObjectStoreClient for MemoryStore {
    async fn delete_object(&self, input: DeleteObjectInput) -> StorageResult<DeleteObjectOutput> {
        self.ensure_bucket(&input.bucket)?;
        let mut objects = self.objects.write().await;
        let versions = objects
            .get_mut(&input.key)
            .ok_or_else(|| self.not_found(&input.key))?;

        let output = match input.version_id {
            Some(version_id) => {
                let index = versions
                    .iter()
                    .position(|v| v.version_id == version_id)
                    .ok_or_else(|| self.not_found(&input.key))?;
                let removed = versions.remove(index);
                DeleteObjectOutput {
                    version_id: Some(removed.version_id),
                    delete_marker: removed.delete_marker,
                }
            }
            None => {
                let marker = StoredVersion {
                    version_id: Uuid::new_v4().simple().to_string(),
                    content_type: None,
                    body: Bytes::new(),
                    etag: None,
                    last_modified: Utc::now(),
                    delete_marker: true,
                };
                let version_id = marker.version_id.clone();
                versions.push(marker);
                DeleteObjectOutput {
                    version_id: Some(version_id),
                    delete_marker: true,
                }
            }
        };

        if versions.is_empty() {
            objects.remove(&input.key);
        }
        debug!(key = %input.key, ?output, "memory store delete");
        Ok(output)
    }

    async fn head_object(&self, input: HeadObjectInput) -> StorageResult<ObjectMetadata> {
        self.ensure_bucket(&input.bucket)?;
        let objects = self.objects.read().await;
        let version = self.find_version(
            objects.get(&input.key),
            &input.key,
            input.version_id.as_deref(),
        )?;
        Ok(version.metadata(&input.key))
    }

    async fn list_object_versions(
        &self,
        input: ListObjectVersionsInput,
    ) -> StorageResult<Vec<ObjectVersion>> {
        self.ensure_bucket(&input.bucket)?;
        let objects = self.objects.read().await;
        let listed = objects
            .range(input.prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&input.prefix))
            .flat_map(|(key, versions)| {
                versions
                    .iter()
                    .rev()
                    .enumerate()
                    .map(move |(index, version)| ObjectVersion {
                        key: key.clone(),
                        version_id: version.version_id.clone(),
                        is_latest: index == 0,
                        is_delete_marker: version.delete_marker,
                        size_bytes: version.body.len() as u64,
                        etag: version.etag.clone(),
                        last_modified: version.last_modified,
                    })
            })
            .collect();
        Ok(listed)
    }

    async fn get_object(&self, input: GetObjectInput) -> StorageResult<GetObjectOutput> {
        self.ensure_bucket(&input.bucket)?;
        let version = {
            let objects = self.objects.read().await;
            self.find_version(
                objects.get(&input.key),
                &input.key,
                input.version_id.as_deref(),
            )?
        };
        Ok(GetObjectOutput {
            metadata: version.metadata(&input.key),
            body: Box::pin(ReaderStream::new(Cursor::new(version.body))),
        })
    }

    async fn put_object(&self, input: PutObjectInput) -> StorageResult<PutObjectOutput> {
        self.ensure_bucket(&input.bucket)?;
        let version = StoredVersion {
            version_id: Uuid::new_v4().simple().to_string(),
            content_type: input.content_type,
            etag: Some(format!("{:x}", md5::compute(&input.body))),
            body: input.body,
            last_modified: Utc::now(),
            delete_marker: false,
        };
        let output = PutObjectOutput {
            version_id: Some(version.version_id.clone()),
            etag: version.etag.clone(),
        };

        self.objects
            .write()
            .await
            .entry(input.key)
            .or_default()
            .push(version);
        Ok(output)
    }

    async fn presign(
        &self,
        command: &StorageCommand,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.ensure_bucket(command.bucket())?;
        self.signer.presign(command, expires_in)
    }
}
