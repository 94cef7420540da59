use crate::{
    models::auth::AuthMode,
    services::{object_storage::ObjectStorageService, signer::UrlSigner},
    utils::path::{DELIMITER, get_path},
};
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub storage: ObjectStorageService,

    /// Verifies links served under `/presigned`.
    pub signer: Arc<UrlSigner>,

    /// Prefix every object key is anchored under.
    pub key_prefix: String,

    /// Resolved once at startup.
    pub auth_mode: AuthMode,
}

impl AppState {
    pub fn new(
        storage: ObjectStorageService,
        signer: Arc<UrlSigner>,
        key_prefix: String,
        auth_mode: AuthMode,
    ) -> Self {
        Self {
            storage,
            signer,
            key_prefix,
            auth_mode,
        }
    }

    /// Canonical store key for a path taken from the request URL.
    ///
    /// URL paths are always relative to the prefix, so leading delimiters are
    /// dropped: with an empty prefix `//a.txt` and `a.txt` address the same key.
    pub fn object_key(&self, path: &str) -> String {
        get_path(&self.key_prefix, path.trim_start_matches(DELIMITER))
    }
}
