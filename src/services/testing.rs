//! Recording fake of [`ObjectStoreClient`] shared by unit tests.

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
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use std::{io, sync::Mutex, time::Duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    Delete(DeleteObjectInput),
    Head(HeadObjectInput),
    ListVersions(ListObjectVersionsInput),
    Read(GetObjectInput),
    Put(PutObjectInput),
    Presign(StorageCommand, Duration),
}

/// Records every call and answers with canned results, or with a
/// transport error when built via [`RecordingClient::failing`].
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Recorded>>,
    failure: Option<(String, String)>,
}

impl RecordingClient {
    pub fn failing(code: &str, message: &str) -> Self {
        Self {
            calls: Mutex::default(),
            failure: Some((code.to_string(), message.to_string())),
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Recorded) -> StorageResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some((code, message)) => Err(StorageError::Transport {
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn metadata(key: &str, version_id: Option<String>) -> ObjectMetadata {
        ObjectMetadata {
            key: key.to_string(),
            version_id,
            content_type: Some("text/plain".into()),
            size_bytes: 5,
            etag: Some("etag".into()),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }
}

#[async_trait]
impl ObjectStoreClient for RecordingClient {
    async fn delete_object(&self, input: DeleteObjectInput) -> StorageResult<DeleteObjectOutput> {
        let version_id = input.version_id.clone();
        self.record(Recorded::Delete(input))?;
        Ok(DeleteObjectOutput {
            delete_marker: version_id.is_none(),
            version_id,
        })
    }

    async fn head_object(&self, input: HeadObjectInput) -> StorageResult<ObjectMetadata> {
        let metadata = Self::metadata(&input.key, input.version_id.clone());
        self.record(Recorded::Head(input))?;
        Ok(metadata)
    }

    async fn list_object_versions(
        &self,
        input: ListObjectVersionsInput,
    ) -> StorageResult<Vec<ObjectVersion>> {
        let key = input.prefix.clone();
        self.record(Recorded::ListVersions(input))?;
        Ok(vec![ObjectVersion {
            key,
            version_id: "v1".into(),
            is_latest: true,
            is_delete_marker: false,
            size_bytes: 5,
            etag: Some("etag".into()),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }])
    }

    async fn get_object(&self, input: GetObjectInput) -> StorageResult<GetObjectOutput> {
        let metadata = Self::metadata(&input.key, input.version_id.clone());
        self.record(Recorded::Read(input))?;
        let chunk: io::Result<Bytes> = Ok(Bytes::from_static(b"hello"));
        Ok(GetObjectOutput {
            metadata,
            body: Box::pin(futures::stream::iter([chunk])),
        })
    }

    async fn put_object(&self, input: PutObjectInput) -> StorageResult<PutObjectOutput> {
        self.record(Recorded::Put(input))?;
        Ok(PutObjectOutput {
            version_id: Some("v1".into()),
            etag: Some("etag".into()),
        })
    }

    async fn presign(
        &self,
        command: &StorageCommand,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.record(Recorded::Presign(command.clone(), expires_in))?;
        Ok(format!(
            "https://signed.example/{}/{}?expires={}",
            command.bucket(),
            command.key(),
            expires_in.as_secs()
        ))
    }
}
