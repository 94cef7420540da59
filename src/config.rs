use crate::models::auth::{BASIC_AUTH_ENABLED, ConfigSource, OIDC_ENABLED};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, fmt};
use uuid::Uuid;

/// Configuration key holding the bucket name.
pub const BUCKET: &str = "objectStorage.bucket";

/// Configuration key holding the key prefix objects are stored under.
pub const KEY_PREFIX: &str = "objectStorage.key";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    pub key_prefix: String,
    pub public_url: String,
    pub signing_secret: String,
    pub basic_auth_enabled: bool,
    pub keycloak_enabled: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Versioned object storage gateway")]
pub struct Args {
    /// Host to bind to (overrides OBJECT_GATEWAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides OBJECT_GATEWAY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bucket all operations target (overrides OBJECT_GATEWAY_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Prefix object keys are stored under (overrides OBJECT_GATEWAY_KEY_PREFIX)
    #[arg(long)]
    pub key_prefix: Option<String>,

    /// Base URL presigned links point at (overrides OBJECT_GATEWAY_PUBLIC_URL)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Secret used to sign presigned links (overrides OBJECT_GATEWAY_SIGNING_SECRET)
    #[arg(long)]
    pub signing_secret: Option<String>,

    /// Enable basic authentication (or set BASICAUTH_ENABLED)
    #[arg(long)]
    pub basic_auth: bool,

    /// Enable OIDC authentication (or set KEYCLOAK_ENABLED)
    #[arg(long)]
    pub keycloak: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_sources(Args::parse(), |name| env::var(name).ok())
    }

    /// Merge parsed `args` over values looked up through `env`.
    pub fn from_sources(args: Args, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_port = match env("OBJECT_GATEWAY_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing OBJECT_GATEWAY_PORT value `{}`", value))?,
            None => 3000,
        };
        let env_basic = parse_flag("BASICAUTH_ENABLED", env("BASICAUTH_ENABLED"))?;
        let env_keycloak = parse_flag("KEYCLOAK_ENABLED", env("KEYCLOAK_ENABLED"))?;

        let port = args.port.unwrap_or(env_port);
        let cfg = Self {
            host: args
                .host
                .or_else(|| env("OBJECT_GATEWAY_HOST"))
                .unwrap_or_else(|| "0.0.0.0".into()),
            port,
            bucket: args
                .bucket
                .or_else(|| env("OBJECT_GATEWAY_BUCKET"))
                .unwrap_or_else(|| "local".into()),
            key_prefix: args
                .key_prefix
                .or_else(|| env("OBJECT_GATEWAY_KEY_PREFIX"))
                .unwrap_or_default(),
            public_url: args
                .public_url
                .or_else(|| env("OBJECT_GATEWAY_PUBLIC_URL"))
                .unwrap_or_else(|| format!("http://localhost:{}", port)),
            signing_secret: args
                .signing_secret
                .or_else(|| env("OBJECT_GATEWAY_SIGNING_SECRET"))
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            basic_auth_enabled: args.basic_auth || env_basic,
            keycloak_enabled: args.keycloak || env_keycloak,
        };

        if cfg.bucket.is_empty() {
            bail!("bucket name must not be empty");
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Interpret an optional boolean environment value.
fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => bail!("parsing {} value `{}`: expected a boolean", name, other),
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bucket", &self.bucket)
            .field("key_prefix", &self.key_prefix)
            .field("public_url", &self.public_url)
            .field("signing_secret", &"<redacted>")
            .field("basic_auth_enabled", &self.basic_auth_enabled)
            .field("keycloak_enabled", &self.keycloak_enabled)
            .finish()
    }
}

/// Auth flags are only present when enabled.
impl ConfigSource for AppConfig {
    fn has(&self, key: &str) -> bool {
        match key {
            BUCKET => true,
            KEY_PREFIX => !self.key_prefix.is_empty(),
            BASIC_AUTH_ENABLED => self.basic_auth_enabled,
            OIDC_ENABLED => self.keycloak_enabled,
            _ => false,
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        if !self.has(key) {
            return None;
        }
        match key {
            BUCKET => Some(self.bucket.clone()),
            KEY_PREFIX => Some(self.key_prefix.clone()),
            BASIC_AUTH_ENABLED | OIDC_ENABLED => Some("true".into()),
            _ => None,
        }
    }
}
