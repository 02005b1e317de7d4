use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Disk,
    S3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub uploads_dir: PathBuf,
    pub public_base_url: String,
    pub s3: Option<S3Config>,
}

/// Sign-in policy, handed to the credential flow explicitly rather than read
/// from process-wide state.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPolicy {
    /// When true, a sign-in with a never-seen email provisions a new account
    /// instead of being rejected.
    pub auto_provision: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub auth: AuthPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: env_or("JWT_ISSUER", "triplog"),
            audience: env_or("JWT_AUDIENCE", "triplog-users"),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };

        let backend = match env_or("STORAGE_BACKEND", "disk").as_str() {
            "disk" => StorageBackend::Disk,
            "s3" => StorageBackend::S3,
            other => anyhow::bail!("unsupported STORAGE_BACKEND {other:?}"),
        };
        let storage = StorageConfig {
            backend,
            uploads_dir: PathBuf::from(env_or("UPLOADS_DIR", "uploads")),
            public_base_url: env_or("PUBLIC_BASE_URL", "/uploads"),
            s3: match backend {
                StorageBackend::S3 => Some(S3Config {
                    endpoint: std::env::var("S3_ENDPOINT")
                        .context("S3_ENDPOINT is required for the s3 backend")?,
                    bucket: std::env::var("S3_BUCKET")
                        .context("S3_BUCKET is required for the s3 backend")?,
                    access_key: std::env::var("S3_ACCESS_KEY")
                        .context("S3_ACCESS_KEY is required for the s3 backend")?,
                    secret_key: std::env::var("S3_SECRET_KEY")
                        .context("S3_SECRET_KEY is required for the s3 backend")?,
                    region: env_or("S3_REGION", "us-east-1"),
                }),
                StorageBackend::Disk => None,
            },
        };

        let auth = AuthPolicy {
            auto_provision: env_parse("AUTH_AUTO_PROVISION", true),
        };

        Ok(Self {
            database_url,
            jwt,
            storage,
            auth,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
