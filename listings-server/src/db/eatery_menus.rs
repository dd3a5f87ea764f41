//! Daily menu database operations
//!
//! One menu per eatery and date; uploading again for the same date replaces
//! the previous file.

use shared::models::EateryMenu;
use shared::util::snowflake_id;
use sqlx::PgPool;

use super::{BoxError, MediaContext};

const COLUMNS: &str = "id, eatery_id, menu_date, file_key, content_type, notes, uploaded_at";

#[derive(sqlx::FromRow)]
struct EateryMenuRow {
    id: i64,
    eatery_id: i64,
    menu_date: String,
    file_key: String,
    content_type: String,
    notes: Option<String>,
    uploaded_at: i64,
}

impl EateryMenuRow {
    fn into_model(self, ctx: &MediaContext) -> EateryMenu {
        EateryMenu {
            url: ctx.url(&self.file_key).unwrap_or(self.file_key),
            id: self.id,
            eatery_id: self.eatery_id,
            menu_date: self.menu_date,
            content_type: self.content_type,
            notes: self.notes,
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Values of an uploaded menu
pub struct NewMenu<'a> {
    pub eatery_id: i64,
    /// YYYY-MM-DD
    pub menu_date: &'a str,
    pub file_key: &'a str,
    pub content_type: &'a str,
    pub notes: Option<&'a str>,
    pub now: i64,
}

/// Insert or replace the menu for `(eatery_id, menu_date)`.
///
/// Returns the stored menu and the file key it replaced, if that differs
/// from the new one.
pub async fn upsert(
    pool: &PgPool,
    ctx: &MediaContext,
    menu: &NewMenu<'_>,
) -> Result<(EateryMenu, Option<String>), BoxError> {
    let mut tx = pool.begin().await?;

    let previous: Option<String> = sqlx::query_scalar(
        "SELECT file_key FROM eatery_menus WHERE eatery_id = $1 AND menu_date = $2 FOR UPDATE",
    )
    .bind(menu.eatery_id)
    .bind(menu.menu_date)
    .fetch_optional(&mut *tx)
    .await?;

    let sql = format!(
        r#"
        INSERT INTO eatery_menus (id, eatery_id, menu_date, file_key, content_type, notes, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (eatery_id, menu_date)
        DO UPDATE SET
            file_key = EXCLUDED.file_key,
            content_type = EXCLUDED.content_type,
            notes = EXCLUDED.notes,
            uploaded_at = EXCLUDED.uploaded_at
        RETURNING {COLUMNS}
        "#
    );
    let row: EateryMenuRow = sqlx::query_as(&sql)
        .bind(snowflake_id())
        .bind(menu.eatery_id)
        .bind(menu.menu_date)
        .bind(menu.file_key)
        .bind(menu.content_type)
        .bind(menu.notes)
        .bind(menu.now)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    let replaced = previous.filter(|key| key != menu.file_key);
    Ok((row.into_model(ctx), replaced))
}

/// Menu published for a given date
pub async fn for_date(
    pool: &PgPool,
    ctx: &MediaContext,
    eatery_id: i64,
    menu_date: &str,
) -> Result<Option<EateryMenu>, BoxError> {
    let sql = format!("SELECT {COLUMNS} FROM eatery_menus WHERE eatery_id = $1 AND menu_date = $2");
    let row: Option<EateryMenuRow> = sqlx::query_as(&sql)
        .bind(eatery_id)
        .bind(menu_date)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

/// Most recent first
pub async fn list_by_eatery(
    pool: &PgPool,
    ctx: &MediaContext,
    eatery_id: i64,
    limit: i64,
) -> Result<Vec<EateryMenu>, BoxError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM eatery_menus WHERE eatery_id = $1 ORDER BY menu_date DESC LIMIT $2"
    );
    let rows: Vec<EateryMenuRow> = sqlx::query_as(&sql)
        .bind(eatery_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

/// Returns the removed file key, `None` when not found
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<String>, BoxError> {
    let key: Option<String> =
        sqlx::query_scalar("DELETE FROM eatery_menus WHERE id = $1 RETURNING file_key")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(key)
}
