use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::Photo;

/// Insert one photo row inside the batch transaction that follows a fully
/// successful upload.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    vacation_id: Uuid,
    url: &str,
    caption: Option<&str>,
) -> anyhow::Result<Photo> {
    let row = sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (user_id, vacation_id, url, caption)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, vacation_id, url, caption, created_at
        "#,
    )
    .bind(user_id)
    .bind(vacation_id)
    .bind(url)
    .bind(caption)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn list_by_vacation(db: &PgPool, vacation_id: Uuid) -> anyhow::Result<Vec<Photo>> {
    let rows = sqlx::query_as::<_, Photo>(
        r#"
        SELECT id, user_id, vacation_id, url, caption, created_at
        FROM photos
        WHERE vacation_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(vacation_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn update_caption_by_owner(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    caption: &str,
) -> anyhow::Result<Option<Photo>> {
    let row = sqlx::query_as::<_, Photo>(
        r#"
        UPDATE photos
           SET caption = $3
         WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, vacation_id, url, caption, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(caption)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Owner-scoped delete, returning the deleted row so the caller can clean up
/// the backing file.
pub async fn delete_by_owner(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Photo>> {
    let row = sqlx::query_as::<_, Photo>(
        r#"
        DELETE FROM photos
         WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, vacation_id, url, caption, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
