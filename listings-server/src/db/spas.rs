//! Spa database operations

use serde_json::Value;
use shared::error::AppResult;
use shared::media::parse_string_list;
use shared::models::{Spa, SpaCreate, SpaUpdate, VenueKind, VenueListQuery};
use sqlx::PgPool;

use super::venue::{self, NewVenue, VenueRow};
use super::{BoxError, MediaContext, VenueStore, clean_tags};

const TABLE: &str = "spas";
const EXTRA_COLUMNS: &str = "treatments, accepts_bookings";

#[derive(sqlx::FromRow)]
struct SpaRow {
    #[sqlx(flatten)]
    venue: VenueRow,
    treatments: Option<Value>,
    accepts_bookings: bool,
}

impl SpaRow {
    fn into_model(self, ctx: &MediaContext) -> Spa {
        Spa {
            venue: self.venue.into_details(ctx),
            treatments: self
                .treatments
                .as_ref()
                .map(parse_string_list)
                .unwrap_or_default(),
            accepts_bookings: self.accepts_bookings,
        }
    }
}

pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<Spa>, BoxError> {
    let mut qb = venue::select(TABLE, EXTRA_COLUMNS);
    venue::push_filters(&mut qb, query, "name, id");
    let rows: Vec<SpaRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

pub async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Spa>, BoxError> {
    let sql = venue::select_by_id_sql(TABLE, EXTRA_COLUMNS);
    let row: Option<SpaRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

pub async fn create(pool: &PgPool, ctx: &MediaContext, data: &SpaCreate) -> Result<Spa, BoxError> {
    let new = NewVenue::prepare(pool, TABLE, &data.venue).await?;
    let id = new.id;

    let mut qb = new.insert_into(TABLE, EXTRA_COLUMNS);
    qb.push(", ")
        .push_bind(clean_tags(&data.treatments))
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
    data: &SpaUpdate,
) -> Result<Option<Spa>, BoxError> {
    let mut qb = venue::update_set(TABLE, &data.venue)?;
    venue::set(&mut qb, "treatments", data.treatments.as_deref().map(clean_tags));
    venue::set(&mut qb, "accepts_bookings", data.accepts_bookings);
    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(pool, TABLE, id, None).await
}

pub struct Spas;

impl VenueStore for Spas {
    const KIND: VenueKind = VenueKind::Spa;

    type Model = Spa;
    type Create = SpaCreate;
    type Update = SpaUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<Spa>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Spa>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(pool: &PgPool, ctx: &MediaContext, data: &SpaCreate) -> Result<Spa, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &SpaUpdate,
    ) -> Result<Option<Spa>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &SpaCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &SpaUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &Spa) -> i64 {
        model.venue.id
    }

    fn is_active(model: &Spa) -> bool {
        model.venue.is_active
    }
}
