//! Award database operations

use shared::models::{Award, AwardCreate, AwardUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::venue::local_keys;
use super::{BoxError, MediaContext, clean_image};

const COLUMNS: &str = "id, restaurant_id, title, issuer, year, image";

#[derive(sqlx::FromRow)]
struct AwardRow {
    id: i64,
    restaurant_id: i64,
    title: String,
    issuer: Option<String>,
    year: Option<i32>,
    image: Option<String>,
}

impl AwardRow {
    fn into_model(self, ctx: &MediaContext) -> Award {
        Award {
            image: self.image.as_deref().and_then(|raw| ctx.url(raw)),
            id: self.id,
            restaurant_id: self.restaurant_id,
            title: self.title,
            issuer: self.issuer,
            year: self.year,
        }
    }
}

pub async fn list_by_restaurant(
    pool: &PgPool,
    ctx: &MediaContext,
    restaurant_id: i64,
) -> Result<Vec<Award>, BoxError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM awards WHERE restaurant_id = $1 ORDER BY year DESC NULLS LAST, title"
    );
    let rows: Vec<AwardRow> = sqlx::query_as(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

pub async fn create(
    pool: &PgPool,
    ctx: &MediaContext,
    restaurant_id: i64,
    data: &AwardCreate,
) -> Result<Award, BoxError> {
    let now = now_millis();
    let sql = format!(
        r#"
        INSERT INTO awards (id, restaurant_id, title, issuer, year, image, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {COLUMNS}
        "#
    );
    let row: AwardRow = sqlx::query_as(&sql)
        .bind(snowflake_id())
        .bind(restaurant_id)
        .bind(data.title.trim())
        .bind(&data.issuer)
        .bind(data.year)
        .bind(data.image.as_deref().and_then(clean_image))
        .bind(now)
        .fetch_one(pool)
        .await?;
    Ok(row.into_model(ctx))
}

pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &AwardUpdate,
) -> Result<Option<Award>, BoxError> {
    let sql = format!(
        r#"
        UPDATE awards SET
            title = COALESCE($2, title),
            issuer = COALESCE($3, issuer),
            year = COALESCE($4, year),
            image = CASE WHEN $5 THEN $6 ELSE image END,
            updated_at = $7
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    );
    let row: Option<AwardRow> = sqlx::query_as(&sql)
        .bind(id)
        .bind(data.title.as_deref().map(str::trim))
        .bind(&data.issuer)
        .bind(data.year)
        .bind(data.image.is_some())
        .bind(data.image.as_deref().and_then(clean_image))
        .bind(now_millis())
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

/// Returns the media keys the award referenced, `None` when not found
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("DELETE FROM awards WHERE id = $1 RETURNING image")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(image,)| local_keys(image)))
}
