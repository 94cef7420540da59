//! Authentication mode resolution.
//!
//! Two independent enable flags (`basicAuth.enabled`, `keycloak.enabled`)
//! collapse into exactly one [`AuthMode`]. Resolution is pure over the flag
//! values and holds no state between calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration key enabling HTTP basic authentication.
pub const BASIC_AUTH_ENABLED: &str = "basicAuth.enabled";

/// Configuration key enabling OIDC (Keycloak) authentication.
pub const OIDC_ENABLED: &str = "keycloak.enabled";

/// Which authentication mechanisms the service enforces.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthMode {
    /// Basic and OIDC both enabled.
    FullAuth,
    /// Neither mechanism enabled.
    NoAuth,
    /// Basic authentication only.
    BasicAuth,
    /// OIDC only.
    OidcAuth,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMode::FullAuth => "FULLAUTH",
            AuthMode::NoAuth => "NOAUTH",
            AuthMode::BasicAuth => "BASICAUTH",
            AuthMode::OidcAuth => "OIDCAUTH",
        };
        f.write_str(name)
    }
}

/// Read-only view over process configuration.
pub trait ConfigSource {
    /// Whether the configuration has an entry for `key`.
    fn has(&self, key: &str) -> bool;

    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// Snapshot of the two auth enable flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthFlags {
    pub basic_auth: bool,
    pub oidc: bool,
}

impl AuthFlags {
    /// Take a snapshot from `source` with one lookup per flag.
    pub fn read(source: &dyn ConfigSource) -> Self {
        Self {
            basic_auth: source.has(BASIC_AUTH_ENABLED),
            oidc: source.has(OIDC_ENABLED),
        }
    }

    /// First match wins: both, then OIDC, then basic, then none.
    pub fn resolve(self) -> AuthMode {
        match (self.basic_auth, self.oidc) {
            (true, true) => AuthMode::FullAuth,
            (_, true) => AuthMode::OidcAuth,
            (true, false) => AuthMode::BasicAuth,
            (false, false) => AuthMode::NoAuth,
        }
    }
}

/// Resolve the auth mode the application should run in.
pub fn get_app_auth_mode(source: &dyn ConfigSource) -> AuthMode {
    AuthFlags::read(source).resolve()
}
