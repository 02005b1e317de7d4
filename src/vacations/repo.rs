use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::Vacation;

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    destination: &str,
    start_date: Date,
    end_date: Date,
    description: Option<&str>,
) -> anyhow::Result<Vacation> {
    let row = sqlx::query_as::<_, Vacation>(
        r#"
        INSERT INTO vacations (user_id, name, destination, start_date, end_date, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, name, destination, start_date, end_date, description, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(destination)
    .bind(start_date)
    .bind(end_date)
    .bind(description)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Most recent trip first.
pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Vacation>> {
    let rows = sqlx::query_as::<_, Vacation>(
        r#"
        SELECT id, user_id, name, destination, start_date, end_date, description, created_at
        FROM vacations
        WHERE user_id = $1
        ORDER BY start_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// `None` when the row is absent or belongs to another user; the two cases
/// are indistinguishable on purpose.
pub async fn find_by_owner(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Vacation>> {
    let row = sqlx::query_as::<_, Vacation>(
        r#"
        SELECT id, user_id, name, destination, start_date, end_date, description, created_at
        FROM vacations
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Owner-scoped patch update; `None` fields keep their current value.
pub async fn update_by_owner(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    destination: Option<&str>,
    start_date: Option<Date>,
    end_date: Option<Date>,
    description: Option<&str>,
) -> anyhow::Result<Option<Vacation>> {
    let row = sqlx::query_as::<_, Vacation>(
        r#"
        UPDATE vacations
           SET name = COALESCE($3, name),
               destination = COALESCE($4, destination),
               start_date = COALESCE($5, start_date),
               end_date = COALESCE($6, end_date),
               description = COALESCE($7, description)
         WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, destination, start_date, end_date, description, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(destination)
    .bind(start_date)
    .bind(end_date)
    .bind(description)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Owner-scoped delete; photos and journal entries cascade with the row.
pub async fn delete_by_owner(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM vacations WHERE id = $1 AND user_id = $2"#)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
