//! Store command shapes.
//!
//! Each input addresses one bucket/key. Version scoping is an `Option` so an
//! absent version never reaches the store as an explicit empty field; the
//! serialized form omits `VersionId` entirely in that case.

use bytes::Bytes;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteObjectInput {
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct HeadObjectInput {
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ListObjectVersionsInput {
    pub bucket: String,
    pub prefix: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GetObjectInput {
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// Single-request upload. The body is not part of the serialized shape.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PutObjectInput {
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip)]
    pub body: Bytes,
}

/// A store operation that can be executed or presigned.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "Command")]
pub enum StorageCommand {
    Delete(DeleteObjectInput),
    Head(HeadObjectInput),
    ListVersions(ListObjectVersionsInput),
    Read(GetObjectInput),
}

impl StorageCommand {
    pub fn bucket(&self) -> &str {
        match self {
            StorageCommand::Delete(input) => &input.bucket,
            StorageCommand::Head(input) => &input.bucket,
            StorageCommand::ListVersions(input) => &input.bucket,
            StorageCommand::Read(input) => &input.bucket,
        }
    }

    /// Object key, or the listing prefix for `ListVersions`.
    pub fn key(&self) -> &str {
        match self {
            StorageCommand::Delete(input) => &input.key,
            StorageCommand::Head(input) => &input.key,
            StorageCommand::ListVersions(input) => &input.prefix,
            StorageCommand::Read(input) => &input.key,
        }
    }

    pub fn version_id(&self) -> Option<&str> {
        match self {
            StorageCommand::Delete(input) => input.version_id.as_deref(),
            StorageCommand::Head(input) => input.version_id.as_deref(),
            StorageCommand::ListVersions(_) => None,
            StorageCommand::Read(input) => input.version_id.as_deref(),
        }
    }

    /// HTTP method a presigned URL for this command is valid for.
    pub fn method(&self) -> &'static str {
        match self {
            StorageCommand::Delete(_) => "DELETE",
            StorageCommand::Head(_) => "HEAD",
            StorageCommand::ListVersions(_) | StorageCommand::Read(_) => "GET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_version_is_not_serialized() {
        let input = DeleteObjectInput {
            bucket: "bucket".into(),
            key: "f".into(),
            version_id: None,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, json!({ "Bucket": "bucket", "Key": "f" }));
    }

    #[test]
    fn present_version_is_serialized() {
        let input = GetObjectInput {
            bucket: "bucket".into(),
            key: "f".into(),
            version_id: Some("1234".into()),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({ "Bucket": "bucket", "Key": "f", "VersionId": "1234" })
        );
    }

    #[test]
    fn command_accessors() {
        let command = StorageCommand::ListVersions(ListObjectVersionsInput {
            bucket: "bucket".into(),
            prefix: "dir/".into(),
        });
        assert_eq!(command.bucket(), "bucket");
        assert_eq!(command.key(), "dir/");
        assert_eq!(command.version_id(), None);
        assert_eq!(command.method(), "GET");
    }

    #[test]
    fn put_body_is_skipped() {
        let input = PutObjectInput {
            bucket: "bucket".into(),
            key: "f".into(),
            content_type: None,
            body: Bytes::from_static(b"payload"),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, json!({ "Bucket": "bucket", "Key": "f" }));
    }
}
