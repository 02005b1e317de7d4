use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::JournalEntry;

/// Plain insert; the caller has already established that the vacation
/// belongs to the acting user.
pub async fn insert(
    db: &PgPool,
    vacation_id: Uuid,
    date: Date,
    entry: &str,
) -> anyhow::Result<JournalEntry> {
    let row = sqlx::query_as::<_, JournalEntry>(
        r#"
        INSERT INTO journal_entries (vacation_id, date, entry)
        VALUES ($1, $2, $3)
        RETURNING id, vacation_id, date, entry, created_at
        "#,
    )
    .bind(vacation_id)
    .bind(date)
    .bind(entry)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn list_by_vacation(db: &PgPool, vacation_id: Uuid) -> anyhow::Result<Vec<JournalEntry>> {
    let rows = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT id, vacation_id, date, entry, created_at
        FROM journal_entries
        WHERE vacation_id = $1
        ORDER BY date ASC, created_at ASC
        "#,
    )
    .bind(vacation_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Patch update scoped through the owning vacation; a miss (no such entry,
/// or a vacation owned by someone else) is `None`.
pub async fn update_by_owner(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    date: Option<Date>,
    entry: Option<&str>,
) -> anyhow::Result<Option<JournalEntry>> {
    let row = sqlx::query_as::<_, JournalEntry>(
        r#"
        UPDATE journal_entries AS je
           SET date = COALESCE($3, je.date),
               entry = COALESCE($4, je.entry)
          FROM vacations AS v
         WHERE je.id = $1 AND v.id = je.vacation_id AND v.user_id = $2
        RETURNING je.id, je.vacation_id, je.date, je.entry, je.created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(date)
    .bind(entry)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete_by_owner(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        DELETE FROM journal_entries AS je
         USING vacations AS v
         WHERE je.id = $1 AND v.id = je.vacation_id AND v.user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() > 0)
}
