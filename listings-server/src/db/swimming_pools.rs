//! Swimming pool database operations

use rust_decimal::Decimal;
use serde_json::Value;
use shared::error::AppResult;
use shared::media::parse_string_list;
use shared::models::{
    SwimmingPool, SwimmingPoolCreate, SwimmingPoolUpdate, VenueKind, VenueListQuery,
};
use sqlx::PgPool;

use super::venue::{self, NewVenue, VenueRow};
use super::{BoxError, MediaContext, VenueStore, clean_tags};

const TABLE: &str = "swimming_pools";
const EXTRA_COLUMNS: &str = "facilities, indoor, heated, entry_price";

#[derive(sqlx::FromRow)]
struct SwimmingPoolRow {
    #[sqlx(flatten)]
    venue: VenueRow,
    facilities: Option<Value>,
    indoor: bool,
    heated: bool,
    entry_price: Option<Decimal>,
}

impl SwimmingPoolRow {
    fn into_model(self, ctx: &MediaContext) -> SwimmingPool {
        SwimmingPool {
            venue: self.venue.into_details(ctx),
            facilities: self
                .facilities
                .as_ref()
                .map(parse_string_list)
                .unwrap_or_default(),
            indoor: self.indoor,
            heated: self.heated,
            entry_price: self.entry_price,
        }
    }
}

pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<SwimmingPool>, BoxError> {
    let mut qb = venue::select(TABLE, EXTRA_COLUMNS);
    venue::push_filters(&mut qb, query, "name, id");
    let rows: Vec<SwimmingPoolRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

pub async fn get(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
) -> Result<Option<SwimmingPool>, BoxError> {
    let sql = venue::select_by_id_sql(TABLE, EXTRA_COLUMNS);
    let row: Option<SwimmingPoolRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

pub async fn create(
    pool: &PgPool,
    ctx: &MediaContext,
    data: &SwimmingPoolCreate,
) -> Result<SwimmingPool, BoxError> {
    let new = NewVenue::prepare(pool, TABLE, &data.venue).await?;
    let id = new.id;

    let mut qb = new.insert_into(TABLE, EXTRA_COLUMNS);
    qb.push(", ")
        .push_bind(clean_tags(&data.facilities))
        .push(", ")
        .push_bind(data.indoor)
        .push(", ")
        .push_bind(data.heated)
        .push(", ")
        .push_bind(data.entry_price)
        .push(")");
    qb.build().execute(pool).await?;

    venue::inserted(get(pool, ctx, id).await?, TABLE, id)
}

pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &SwimmingPoolUpdate,
) -> Result<Option<SwimmingPool>, BoxError> {
    let mut qb = venue::update_set(TABLE, &data.venue)?;
    venue::set(&mut qb, "facilities", data.facilities.as_deref().map(clean_tags));
    venue::set(&mut qb, "indoor", data.indoor);
    venue::set(&mut qb, "heated", data.heated);
    venue::set(&mut qb, "entry_price", data.entry_price);
    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(pool, TABLE, id, None).await
}

pub struct SwimmingPools;

impl VenueStore for SwimmingPools {
    const KIND: VenueKind = VenueKind::SwimmingPool;

    type Model = SwimmingPool;
    type Create = SwimmingPoolCreate;
    type Update = SwimmingPoolUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<SwimmingPool>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
    ) -> Result<Option<SwimmingPool>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(
        pool: &PgPool,
        ctx: &MediaContext,
        data: &SwimmingPoolCreate,
    ) -> Result<SwimmingPool, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &SwimmingPoolUpdate,
    ) -> Result<Option<SwimmingPool>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &SwimmingPoolCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &SwimmingPoolUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &SwimmingPool) -> i64 {
        model.venue.id
    }

    fn is_active(model: &SwimmingPool) -> bool {
        model.venue.is_active
    }
}
