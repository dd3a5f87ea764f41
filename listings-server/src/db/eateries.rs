//! Eatery database operations, including the menu password hash

use shared::error::AppResult;
use shared::models::{Eatery, EateryCreate, EateryUpdate, VenueKind, VenueListQuery};
use shared::util::now_millis;
use sqlx::PgPool;

use super::venue::{self, NewVenue, VenueRow};
use super::{BoxError, MediaContext, VenueStore};

const TABLE: &str = "eateries";
const EXTRA_COLUMNS: &str =
    "cuisine, accepts_bookings, (menu_password_hash IS NOT NULL) AS has_menu_password";
const INSERT_COLUMNS: &str = "cuisine, accepts_bookings";

#[derive(sqlx::FromRow)]
struct EateryRow {
    #[sqlx(flatten)]
    venue: VenueRow,
    cuisine: Option<String>,
    accepts_bookings: bool,
    has_menu_password: bool,
}

impl EateryRow {
    fn into_model(self, ctx: &MediaContext) -> Eatery {
        Eatery {
            venue: self.venue.into_details(ctx),
            cuisine: self.cuisine,
            accepts_bookings: self.accepts_bookings,
            has_menu_password: self.has_menu_password,
        }
    }
}

pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<Eatery>, BoxError> {
    let mut qb = venue::select(TABLE, EXTRA_COLUMNS);
    venue::push_filters(&mut qb, query, "name, id");
    let rows: Vec<EateryRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

pub async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Eatery>, BoxError> {
    let sql = venue::select_by_id_sql(TABLE, EXTRA_COLUMNS);
    let row: Option<EateryRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

pub async fn create(
    pool: &PgPool,
    ctx: &MediaContext,
    data: &EateryCreate,
) -> Result<Eatery, BoxError> {
    let new = NewVenue::prepare(pool, TABLE, &data.venue).await?;
    let id = new.id;

    let mut qb = new.insert_into(TABLE, INSERT_COLUMNS);
    qb.push(", ")
        .push_bind(data.cuisine.clone())
        .push(", ")
        .push_bind(data.accepts_bookings)
        .push(")");
    qb.build().execute(pool).await?;

    venue::inserted(get(pool, ctx, id).await?, TABLE, id)
}

pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &EateryUpdate,
) -> Result<Option<Eatery>, BoxError> {
    let mut qb = venue::update_set(TABLE, &data.venue)?;
    venue::set(&mut qb, "cuisine", data.cuisine.clone());
    venue::set(&mut qb, "accepts_bookings", data.accepts_bookings);
    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

/// Daily menus go with the eatery
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(
        pool,
        TABLE,
        id,
        Some("SELECT file_key FROM eatery_menus WHERE eatery_id = $1"),
    )
    .await
}

// ── Menu password ──

/// Store a new argon2 hash; `false` when the eatery does not exist
pub async fn set_menu_password(pool: &PgPool, id: i64, hash: &str) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE eateries SET menu_password_hash = $2, updated_at = $3 WHERE id = $1",
    )
    .bind(id)
    .bind(hash)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Disable menu uploads; `false` when the eatery does not exist
pub async fn clear_menu_password(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE eateries SET menu_password_hash = NULL, updated_at = $2 WHERE id = $1",
    )
    .bind(id)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Outer `None`: no active eatery. Inner `None`: no password configured.
pub async fn menu_password_hash(
    pool: &PgPool,
    id: i64,
) -> Result<Option<Option<String>>, BoxError> {
    let hash: Option<Option<String>> = sqlx::query_scalar(
        "SELECT menu_password_hash FROM eateries WHERE id = $1 AND is_active",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(hash)
}

pub struct Eateries;

impl VenueStore for Eateries {
    const KIND: VenueKind = VenueKind::Eatery;

    type Model = Eatery;
    type Create = EateryCreate;
    type Update = EateryUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<Eatery>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Eatery>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(
        pool: &PgPool,
        ctx: &MediaContext,
        data: &EateryCreate,
    ) -> Result<Eatery, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &EateryUpdate,
    ) -> Result<Option<Eatery>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &EateryCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &EateryUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &Eatery) -> i64 {
        model.venue.id
    }

    fn is_active(model: &Eatery) -> bool {
        model.venue.is_active
    }
}
