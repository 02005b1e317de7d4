use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::config::S3Config;

/// Backing store for uploaded photo files.
///
/// `store` persists the bytes under a name derived from `suggested_name` and
/// returns the public URL the photo row will carry; `remove` undoes a prior
/// `store` given that URL.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(
        &self,
        suggested_name: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String>;

    async fn remove(&self, public_url: &str) -> anyhow::Result<()>;
}

/// Collision-proof object key: uuid prefix plus the suggested name with
/// anything hostile to paths and URLs replaced.
fn object_key(suggested_name: &str) -> String {
    let safe: String = suggested_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}-{}", Uuid::new_v4(), safe.trim_matches('-'))
}

/// Map a public URL back to the object key it was issued for. URLs that do
/// not belong to this store, and keys that would escape it, are errors.
fn key_from_url<'a>(public_url: &'a str, base: &str) -> anyhow::Result<&'a str> {
    let key = public_url
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .with_context(|| format!("url {public_url} does not belong to this store"))?;
    // keys never contain a separator, so a bare dot component is the only
    // way left to escape the store
    anyhow::ensure!(
        !key.is_empty() && !key.contains('/') && key != "." && key != "..",
        "bad object key in url {public_url}"
    );
    Ok(key)
}

/// Local-filesystem store: files under `root`, URLs under `public_base`.
/// The directory is served statically by the router.
pub struct DiskStore {
    root: PathBuf,
    public_base: String,
}

impl DiskStore {
    pub fn new(root: PathBuf, public_base: String) -> Self {
        Self {
            root,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FileStore for DiskStore {
    async fn store(
        &self,
        suggested_name: &str,
        body: Bytes,
        _content_type: &str,
    ) -> anyhow::Result<String> {
        let key = object_key(suggested_name);
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("create uploads dir")?;
        let path = self.root.join(&key);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(key = %key, bytes = body.len(), "stored upload on disk");
        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn remove(&self, public_url: &str) -> anyhow::Result<()> {
        let key = key_from_url(public_url, &self.public_base)?;
        let path = self.root.join(key);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove {}", path.display()))?;
        Ok(())
    }
}

/// S3-compatible store (MinIO etc.), path-style addressing with static
/// credentials. Public URLs are `{public_base}/{key}`.
pub struct S3Store {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3Store {
    pub async fn new(cfg: &S3Config, public_base: &str) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                cfg.access_key.clone(),
                cfg.secret_key.clone(),
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FileStore for S3Store {
    async fn store(
        &self,
        suggested_name: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let key = object_key(suggested_name);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn remove(&self, public_url: &str) -> anyhow::Result<()> {
        let key = key_from_url(public_url, &self.public_base)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_is_unique_per_call() {
        let a = object_key("beach.jpg");
        let b = object_key("beach.jpg");
        assert_ne!(a, b);
        assert!(a.ends_with("beach.jpg"));
    }

    #[test]
    fn object_key_replaces_hostile_characters() {
        let key = object_key("../../etc/passwd");
        assert!(!key.contains('/'));
        assert!(key.ends_with("etc-passwd"));

        let key = object_key("summer holiday.png");
        assert!(key.ends_with("summer-holiday.png"));
    }

    #[test]
    fn key_from_url_requires_matching_base() {
        assert_eq!(
            key_from_url("/uploads/abc-pic.jpg", "/uploads").unwrap(),
            "abc-pic.jpg"
        );
        assert!(key_from_url("https://elsewhere/abc.jpg", "/uploads").is_err());
        assert!(key_from_url("/uploads/", "/uploads").is_err());
        assert!(key_from_url("/uploads/a/../b", "/uploads").is_err());
        assert!(key_from_url("/uploads/..", "/uploads").is_err());

        // dots inside a key are harmless without a separator
        assert_eq!(
            key_from_url("/uploads/abc-..-etc-passwd", "/uploads").unwrap(),
            "abc-..-etc-passwd"
        );
    }

    #[tokio::test]
    async fn disk_store_roundtrip() {
        let root = std::env::temp_dir().join(format!("triplog-test-{}", Uuid::new_v4()));
        let store = DiskStore::new(root.clone(), "/uploads/".into());

        let url = store
            .store("pic.jpg", Bytes::from_static(b"jpegbytes"), "image/jpeg")
            .await
            .expect("store should succeed");
        assert!(url.starts_with("/uploads/"));

        let key = key_from_url(&url, "/uploads").unwrap();
        let on_disk = tokio::fs::read(root.join(key)).await.expect("file written");
        assert_eq!(on_disk, b"jpegbytes");

        store.remove(&url).await.expect("remove should succeed");
        assert!(!root.join(key).exists());
        assert!(store.remove(&url).await.is_err());

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
