//! Presigned URL signing and verification.
//!
//! Links have the form
//! `{public_url}/presigned/{bucket}/{key}?versionId=..&X-Method=..&X-Expires=..&X-Signature=..`.
//! The signature is an HMAC-SHA256 over the HTTP method, the expiry (unix
//! seconds) and the serialized [`StorageCommand`], keyed with a shared
//! secret. Verification rebuilds the command from the incoming request, so a
//! link only ever authorizes the exact command it was issued for.

use crate::{
    models::command::{DeleteObjectInput, GetObjectInput, HeadObjectInput, StorageCommand},
    services::client::{StorageError, StorageResult},
};
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::{fmt, time::Duration};

type HmacSha256 = Hmac<Sha256>;

/// First path segment of presigned links.
pub const PRESIGNED_PATH: &str = "presigned";

/// Signature parameters carried in a presigned link's query string.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PresignedQuery {
    #[serde(rename = "versionId")]
    pub version_id: Option<String>,
    #[serde(rename = "X-Method")]
    pub method: String,
    #[serde(rename = "X-Expires")]
    pub expires_at: i64,
    #[serde(rename = "X-Signature")]
    pub signature: String,
}

pub struct UrlSigner {
    bucket: String,
    public_url: String,
    secret: String,
}

impl fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlSigner")
            .field("bucket", &self.bucket)
            .field("public_url", &self.public_url)
            .finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Sign links for `bucket`, rooted at `public_url` (the gateway's
    /// externally reachable base URL).
    pub fn new(
        bucket: impl Into<String>,
        public_url: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
        }
    }

    fn mac(&self, command: &StorageCommand, expires_at: i64) -> StorageResult<HmacSha256> {
        let payload =
            serde_json::to_string(command).map_err(|err| StorageError::Signing(err.to_string()))?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|err| StorageError::Signing(err.to_string()))?;
        mac.update(command.method().as_bytes());
        mac.update(b"\n");
        mac.update(expires_at.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    /// Link valid for `expires_in` from now.
    pub fn presign(&self, command: &StorageCommand, expires_in: Duration) -> StorageResult<String> {
        let lifetime = i64::try_from(expires_in.as_secs())
            .map_err(|_| StorageError::Signing("expiry out of range".into()))?;
        self.sign_until(command, Utc::now().timestamp().saturating_add(lifetime))
    }

    /// Link valid until the unix timestamp `expires_at`.
    pub fn sign_until(&self, command: &StorageCommand, expires_at: i64) -> StorageResult<String> {
        if matches!(command, StorageCommand::ListVersions(_)) {
            return Err(StorageError::Signing(
                "version listings cannot be presigned".into(),
            ));
        }
        if command.bucket() != self.bucket {
            return Err(StorageError::Signing(format!(
                "bucket `{}` is not served here",
                command.bucket()
            )));
        }

        let digest = self.mac(command, expires_at)?.finalize().into_bytes();
        let signature = general_purpose::URL_SAFE_NO_PAD.encode(digest);
        let key = command
            .key()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut url = format!(
            "{}/{}/{}/{}?",
            self.public_url, PRESIGNED_PATH, self.bucket, key
        );
        if let Some(version_id) = command.version_id() {
            url.push_str(&format!("versionId={}&", urlencoding::encode(version_id)));
        }
        url.push_str(&format!(
            "X-Method={}&X-Expires={}&X-Signature={}",
            command.method(),
            expires_at,
            signature
        ));
        Ok(url)
    }

    /// Check a presigned request and return the command it authorizes.
    ///
    /// `method` is the incoming HTTP method and `now` the current unix time.
    pub fn verify(
        &self,
        method: &str,
        bucket: &str,
        key: &str,
        query: &PresignedQuery,
        now: i64,
    ) -> StorageResult<StorageCommand> {
        if bucket != self.bucket {
            return Err(StorageError::Forbidden(format!(
                "bucket `{}` is not served here",
                bucket
            )));
        }
        if method != query.method {
            return Err(StorageError::Forbidden(format!(
                "link was issued for {}, not {}",
                query.method, method
            )));
        }
        if now > query.expires_at {
            return Err(StorageError::Forbidden("link has expired".into()));
        }

        let bucket = bucket.to_string();
        let key = key.to_string();
        let version_id = query.version_id.clone();
        let command = match method {
            "GET" => StorageCommand::Read(GetObjectInput {
                bucket,
                key,
                version_id,
            }),
            "HEAD" => StorageCommand::Head(HeadObjectInput {
                bucket,
                key,
                version_id,
            }),
            "DELETE" => StorageCommand::Delete(DeleteObjectInput {
                bucket,
                key,
                version_id,
            }),
            other => {
                return Err(StorageError::Forbidden(format!(
                    "method {} cannot be presigned",
                    other
                )));
            }
        };

        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(&query.signature)
            .map_err(|_| StorageError::Forbidden("malformed signature".into()))?;
        self.mac(&command, query.expires_at)?
            .verify_slice(&signature)
            .map_err(|_| StorageError::Forbidden("signature mismatch".into()))?;

        Ok(command)
    }
}
