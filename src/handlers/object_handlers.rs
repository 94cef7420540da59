//! HTTP handlers for object operations.
//! Paths from the URL are anchored under the configured key prefix and
//! handed to `ObjectStorageService`; bodies are streamed, never buffered.
//! Presigned links carry the full store key and skip the prefix.

use crate::{
    errors::AppError,
    models::{
        command::StorageCommand,
        object::{DeleteObjectOutput, GetObjectOutput, ObjectMetadata},
    },
    services::{
        object_storage::{ObjectRequest, SignedUrlRequest, UploadRequest},
        signer::PresignedQuery,
    },
    state::AppState,
};
use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

const VERSION_ID_HEADER: &str = "x-amz-version-id";
const DELETE_MARKER_HEADER: &str = "x-amz-delete-marker";

/// How `GET /object/{*path}` hands content to the caller.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Stream the content through the gateway.
    #[default]
    Proxy,
    /// Return a presigned URL as JSON.
    Url,
    /// Answer `302 Found` pointing at a presigned URL.
    Redirect,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectQuery {
    pub version_id: Option<String>,
    pub download: Option<DownloadMode>,
    pub expires_in: Option<u64>,
}

/// PUT `/object/{*path}` — upload in a single request.
pub async fn upload_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let output = state
        .storage
        .upload_object(UploadRequest {
            file_path: state.object_key(&path),
            content_type,
            body,
        })
        .await?;

    let mut resp_headers = HeaderMap::new();
    insert_version_header(&mut resp_headers, output.version_id.as_deref());
    if let Some(value) = output.etag.as_ref().map(|e| format!("\"{}\"", e)) {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            resp_headers.insert(header::ETAG, header_value);
        }
    }

    Ok((StatusCode::OK, resp_headers, Json(output)).into_response())
}

/// GET `/object/{*path}` — stream content, or hand out a presigned link.
pub async fn get_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(q): Query<ObjectQuery>,
) -> Result<Response, AppError> {
    let file_path = state.object_key(&path);

    match q.download.unwrap_or_default() {
        DownloadMode::Proxy => {
            let output = state
                .storage
                .read_object(ObjectRequest {
                    file_path,
                    version_id: q.version_id,
                })
                .await?;
            Ok(content_response(output))
        }
        mode => {
            let url = state
                .storage
                .read_signed_url(SignedUrlRequest {
                    file_path,
                    version_id: q.version_id,
                    expires_in: q.expires_in,
                })
                .await?;

            if mode == DownloadMode::Redirect {
                let location = HeaderValue::from_str(&url)
                    .map_err(|err| AppError::internal(format!("invalid presigned url: {}", err)))?;
                Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
            } else {
                Ok(Json(json!({ "url": url })).into_response())
            }
        }
    }
}

/// HEAD `/object/{*path}` — same headers as GET but no body.
pub async fn head_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(q): Query<ObjectQuery>,
) -> Result<Response, AppError> {
    let meta = state
        .storage
        .head_object(ObjectRequest {
            file_path: state.object_key(&path),
            version_id: q.version_id,
        })
        .await?;
    Ok(metadata_response(&meta))
}

/// DELETE `/object/{*path}` — delete the object, or one version of it.
pub async fn delete_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(q): Query<ObjectQuery>,
) -> Result<Response, AppError> {
    let output = state
        .storage
        .delete_object(ObjectRequest {
            file_path: state.object_key(&path),
            version_id: q.version_id,
        })
        .await?;
    Ok(deletion_response(output))
}

/// GET `/version/{*path}` — every version stored under the path.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let versions = state
        .storage
        .list_object_version(ObjectRequest::new(state.object_key(&path)))
        .await?;
    Ok(Json(versions).into_response())
}

/// GET/HEAD/DELETE `/presigned/{bucket}/{*key}` — run the command a
/// presigned link was issued for.
pub async fn presigned_request(
    State(state): State<AppState>,
    method: Method,
    Path((bucket, key)): Path<(String, String)>,
    Query(q): Query<PresignedQuery>,
) -> Result<Response, AppError> {
    let command = state
        .signer
        .verify(method.as_str(), &bucket, &key, &q, Utc::now().timestamp())
        .inspect_err(|err| tracing::info!(%bucket, %key, "presigned request rejected: {}", err))?;

    match command {
        StorageCommand::Read(input) => {
            let output = state
                .storage
                .read_object(ObjectRequest {
                    file_path: input.key,
                    version_id: input.version_id,
                })
                .await?;
            Ok(content_response(output))
        }
        StorageCommand::Head(input) => {
            let meta = state
                .storage
                .head_object(ObjectRequest {
                    file_path: input.key,
                    version_id: input.version_id,
                })
                .await?;
            Ok(metadata_response(&meta))
        }
        StorageCommand::Delete(input) => {
            let output = state
                .storage
                .delete_object(ObjectRequest {
                    file_path: input.key,
                    version_id: input.version_id,
                })
                .await?;
            Ok(deletion_response(output))
        }
        StorageCommand::ListVersions(_) => Err(AppError::new(
            StatusCode::FORBIDDEN,
            "version listings cannot be presigned",
        )),
    }
}

fn content_response(output: GetObjectOutput) -> Response {
    let mut response = Response::new(Body::from_stream(output.body));
    *response.status_mut() = StatusCode::OK;
    set_object_headers(response.headers_mut(), &output.metadata);
    response
}

fn metadata_response(meta: &ObjectMetadata) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    set_object_headers(response.headers_mut(), meta);
    response
}

fn deletion_response(output: DeleteObjectOutput) -> Response {
    let mut headers = HeaderMap::new();
    insert_version_header(&mut headers, output.version_id.as_deref());
    if output.delete_marker {
        headers.insert(DELETE_MARKER_HEADER, HeaderValue::from_static("true"));
    }
    (StatusCode::OK, headers, Json(output)).into_response()
}

fn insert_version_header(headers: &mut HeaderMap, version_id: Option<&str>) {
    if let Some(value) = version_id.and_then(|v| HeaderValue::from_str(v).ok()) {
        headers.insert(VERSION_ID_HEADER, value);
    }
}

fn set_object_headers(headers: &mut HeaderMap, meta: &ObjectMetadata) {
    let content_type = meta
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".into());
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(meta.size_bytes));

    if let Some(etag) = meta.etag.as_ref() {
        let quoted = format!("\"{}\"", etag);
        if let Ok(value) = HeaderValue::from_str(&quoted) {
            headers.insert(header::ETAG, value);
        }
    }

    if let Ok(value) = HeaderValue::from_str(&meta.last_modified.to_rfc2822()) {
        headers.insert(header::LAST_MODIFIED, value);
    }

    insert_version_header(headers, meta.version_id.as_deref());
}
