use anyhow::Context;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;
use crate::storage::FileStore;

use super::repo;
use super::repo_types::Photo;

pub struct UploadItem {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Upload every file, then link the batch to the vacation in one
/// transaction. Rows are written only after every upload succeeded, so a
/// failed batch can leave files behind but never a photo row without its
/// file.
pub async fn upload_and_attach(
    state: &AppState,
    user_id: Uuid,
    vacation_id: Uuid,
    files: Vec<UploadItem>,
) -> anyhow::Result<Vec<Photo>> {
    anyhow::ensure!(!files.is_empty(), "no files provided");

    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let url = state
            .storage
            .store(&file.file_name, file.body, &file.content_type)
            .await
            .with_context(|| format!("store {}", file.file_name))?;
        urls.push(url);
    }

    let mut tx = state.db.begin().await.context("begin tx")?;
    let mut photos = Vec::with_capacity(urls.len());
    for url in &urls {
        photos.push(repo::insert_tx(&mut tx, user_id, vacation_id, url, None).await?);
    }
    tx.commit().await.context("commit tx")?;

    Ok(photos)
}

/// Best-effort removal of the file behind a deleted photo row. A failure
/// here must never undo the row deletion, so it is logged and swallowed.
pub async fn remove_backing_file(storage: &dyn FileStore, url: &str) {
    if let Err(e) = storage.remove(url).await {
        warn!(url = %url, error = %e, "failed to remove backing file; leaving orphan");
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FailingStore;

    #[async_trait]
    impl FileStore for FailingStore {
        async fn store(
            &self,
            _suggested_name: &str,
            _body: Bytes,
            _content_type: &str,
        ) -> anyhow::Result<String> {
            anyhow::bail!("store is down")
        }

        async fn remove(&self, _public_url: &str) -> anyhow::Result<()> {
            anyhow::bail!("store is down")
        }
    }

    #[tokio::test]
    async fn remove_backing_file_swallows_store_failure() {
        // the named recovery path: the row deletion already happened, a
        // failing file removal only logs
        remove_backing_file(&FailingStore, "/uploads/gone.jpg").await;
    }
}
