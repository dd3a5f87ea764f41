//! Beach image database operations

use shared::error::AppError;
use shared::models::{BeachImage, BeachImageCreate, BeachImageUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::venue::local_keys;
use super::{BoxError, MediaContext, clean_image};

const COLUMNS: &str = "id, beach_id, image, caption, sort_order";

#[derive(sqlx::FromRow)]
struct BeachImageRow {
    id: i64,
    beach_id: i64,
    image: String,
    caption: Option<String>,
    sort_order: i32,
}

impl BeachImageRow {
    fn into_model(self, ctx: &MediaContext) -> BeachImage {
        BeachImage {
            url: ctx.url(&self.image).unwrap_or(self.image),
            id: self.id,
            beach_id: self.beach_id,
            caption: self.caption,
            sort_order: self.sort_order,
        }
    }
}

pub async fn list_by_beach(
    pool: &PgPool,
    ctx: &MediaContext,
    beach_id: i64,
) -> Result<Vec<BeachImage>, BoxError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM beach_images WHERE beach_id = $1 ORDER BY sort_order, id"
    );
    let rows: Vec<BeachImageRow> = sqlx::query_as(&sql).bind(beach_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

/// Without an explicit `sort_order` the image goes last
pub async fn add(
    pool: &PgPool,
    ctx: &MediaContext,
    beach_id: i64,
    data: &BeachImageCreate,
) -> Result<BeachImage, BoxError> {
    let image = clean_image(&data.image).ok_or_else(|| {
        AppError::validation(format!("image is not a valid media path: {}", data.image))
            .with_detail("field", "image")
    })?;

    let sql = format!(
        r#"
        INSERT INTO beach_images (id, beach_id, image, caption, sort_order, created_at)
        VALUES (
            $1, $2, $3, $4,
            COALESCE($5, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM beach_images WHERE beach_id = $2)),
            $6
        )
        RETURNING {COLUMNS}
        "#
    );
    let row: BeachImageRow = sqlx::query_as(&sql)
        .bind(snowflake_id())
        .bind(beach_id)
        .bind(&image)
        .bind(&data.caption)
        .bind(data.sort_order)
        .bind(now_millis())
        .fetch_one(pool)
        .await?;
    Ok(row.into_model(ctx))
}

pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &BeachImageUpdate,
) -> Result<Option<BeachImage>, BoxError> {
    let sql = format!(
        r#"
        UPDATE beach_images SET
            caption = COALESCE($2, caption),
            sort_order = COALESCE($3, sort_order)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    );
    let row: Option<BeachImageRow> = sqlx::query_as(&sql)
        .bind(id)
        .bind(&data.caption)
        .bind(data.sort_order)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

/// Returns the media key of the removed image, `None` when not found
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    let row: Option<(String,)> =
        sqlx::query_as("DELETE FROM beach_images WHERE id = $1 RETURNING image")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(image,)| local_keys([image])))
}
