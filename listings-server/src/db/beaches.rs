//! Beach database operations

use serde_json::Value;
use shared::error::AppResult;
use shared::media::parse_string_list;
use shared::models::{Beach, BeachCreate, BeachUpdate, VenueKind, VenueListQuery};
use sqlx::PgPool;

use super::venue::{self, NewVenue, VenueRow};
use super::{BoxError, MediaContext, VenueStore, beach_images, clean_tags};

const TABLE: &str = "beaches";
const EXTRA_COLUMNS: &str = "facilities, blue_flag, lifeguard, accessible";

#[derive(sqlx::FromRow)]
struct BeachRow {
    #[sqlx(flatten)]
    venue: VenueRow,
    facilities: Option<Value>,
    blue_flag: bool,
    lifeguard: bool,
    accessible: bool,
}

impl BeachRow {
    fn into_model(self, ctx: &MediaContext) -> Beach {
        Beach {
            venue: self.venue.into_details(ctx),
            facilities: self
                .facilities
                .as_ref()
                .map(parse_string_list)
                .unwrap_or_default(),
            blue_flag: self.blue_flag,
            lifeguard: self.lifeguard,
            accessible: self.accessible,
            images: Vec::new(),
        }
    }
}

pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<Beach>, BoxError> {
    let mut qb = venue::select(TABLE, EXTRA_COLUMNS);
    venue::push_filters(&mut qb, query, "name, id");
    let rows: Vec<BeachRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

/// Detail read with the image gallery
pub async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Beach>, BoxError> {
    let sql = venue::select_by_id_sql(TABLE, EXTRA_COLUMNS);
    let row: Option<BeachRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut beach = row.into_model(ctx);
    beach.images = beach_images::list_by_beach(pool, ctx, id).await?;
    Ok(Some(beach))
}

pub async fn create(
    pool: &PgPool,
    ctx: &MediaContext,
    data: &BeachCreate,
) -> Result<Beach, BoxError> {
    let new = NewVenue::prepare(pool, TABLE, &data.venue).await?;
    let id = new.id;

    let mut qb = new.insert_into(TABLE, EXTRA_COLUMNS);
    qb.push(", ")
        .push_bind(clean_tags(&data.facilities))
        .push(", ")
        .push_bind(data.blue_flag)
        .push(", ")
        .push_bind(data.lifeguard)
        .push(", ")
        .push_bind(data.accessible)
        .push(")");
    qb.build().execute(pool).await?;

    venue::inserted(get(pool, ctx, id).await?, TABLE, id)
}

pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &BeachUpdate,
) -> Result<Option<Beach>, BoxError> {
    let mut qb = venue::update_set(TABLE, &data.venue)?;
    venue::set(&mut qb, "facilities", data.facilities.as_deref().map(clean_tags));
    venue::set(&mut qb, "blue_flag", data.blue_flag);
    venue::set(&mut qb, "lifeguard", data.lifeguard);
    venue::set(&mut qb, "accessible", data.accessible);
    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

/// Gallery images go with the beach
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(
        pool,
        TABLE,
        id,
        Some("SELECT image FROM beach_images WHERE beach_id = $1"),
    )
    .await
}

pub struct Beaches;

impl VenueStore for Beaches {
    const KIND: VenueKind = VenueKind::Beach;

    type Model = Beach;
    type Create = BeachCreate;
    type Update = BeachUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<Beach>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Beach>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(pool: &PgPool, ctx: &MediaContext, data: &BeachCreate) -> Result<Beach, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &BeachUpdate,
    ) -> Result<Option<Beach>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &BeachCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &BeachUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &Beach) -> i64 {
        model.venue.id
    }

    fn is_active(model: &Beach) -> bool {
        model.venue.is_active
    }
}
