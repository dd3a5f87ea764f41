//! Gym database operations

use rust_decimal::Decimal;
use serde_json::Value;
use shared::error::AppResult;
use shared::media::parse_string_list;
use shared::models::{Gym, GymCreate, GymUpdate, VenueKind, VenueListQuery};
use sqlx::PgPool;

use super::venue::{self, NewVenue, VenueRow};
use super::{BoxError, MediaContext, VenueStore, clean_tags};

const TABLE: &str = "gyms";
const EXTRA_COLUMNS: &str = "facilities, day_pass_price";

#[derive(sqlx::FromRow)]
struct GymRow {
    #[sqlx(flatten)]
    venue: VenueRow,
    facilities: Option<Value>,
    day_pass_price: Option<Decimal>,
}

impl GymRow {
    fn into_model(self, ctx: &MediaContext) -> Gym {
        Gym {
            venue: self.venue.into_details(ctx),
            facilities: self
                .facilities
                .as_ref()
                .map(parse_string_list)
                .unwrap_or_default(),
            day_pass_price: self.day_pass_price,
        }
    }
}

pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<Gym>, BoxError> {
    let mut qb = venue::select(TABLE, EXTRA_COLUMNS);
    venue::push_filters(&mut qb, query, "name, id");
    let rows: Vec<GymRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

pub async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Gym>, BoxError> {
    let sql = venue::select_by_id_sql(TABLE, EXTRA_COLUMNS);
    let row: Option<GymRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

pub async fn create(pool: &PgPool, ctx: &MediaContext, data: &GymCreate) -> Result<Gym, BoxError> {
    let new = NewVenue::prepare(pool, TABLE, &data.venue).await?;
    let id = new.id;

    let mut qb = new.insert_into(TABLE, EXTRA_COLUMNS);
    qb.push(", ")
        .push_bind(clean_tags(&data.facilities))
        .push(", ")
        .push_bind(data.day_pass_price)
        .push(")");
    qb.build().execute(pool).await?;

    venue::inserted(get(pool, ctx, id).await?, TABLE, id)
}

pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &GymUpdate,
) -> Result<Option<Gym>, BoxError> {
    let mut qb = venue::update_set(TABLE, &data.venue)?;
    venue::set(&mut qb, "facilities", data.facilities.as_deref().map(clean_tags));
    venue::set(&mut qb, "day_pass_price", data.day_pass_price);
    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(pool, TABLE, id, None).await
}

pub struct Gyms;

impl VenueStore for Gyms {
    const KIND: VenueKind = VenueKind::Gym;

    type Model = Gym;
    type Create = GymCreate;
    type Update = GymUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<Gym>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Gym>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(pool: &PgPool, ctx: &MediaContext, data: &GymCreate) -> Result<Gym, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &GymUpdate,
    ) -> Result<Option<Gym>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &GymCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &GymUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &Gym) -> i64 {
        model.venue.id
    }

    fn is_active(model: &Gym) -> bool {
        model.venue.is_active
    }
}
