//! Restaurant database operations

use shared::error::AppResult;
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate, VenueKind, VenueListQuery};
use sqlx::PgPool;

use super::venue::{self, NewVenue, VenueRow};
use super::{BoxError, MediaContext, VenueStore, awards};

const TABLE: &str = "restaurants";
const EXTRA_COLUMNS: &str = "cuisine, price_range, accepts_bookings";

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    #[sqlx(flatten)]
    venue: VenueRow,
    cuisine: Option<String>,
    price_range: Option<i16>,
    accepts_bookings: bool,
}

impl RestaurantRow {
    fn into_model(self, ctx: &MediaContext) -> Restaurant {
        Restaurant {
            venue: self.venue.into_details(ctx),
            cuisine: self.cuisine,
            price_range: self.price_range,
            accepts_bookings: self.accepts_bookings,
            awards: Vec::new(),
        }
    }
}

pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<Restaurant>, BoxError> {
    let mut qb = venue::select(TABLE, EXTRA_COLUMNS);
    venue::push_filters(&mut qb, query, "name, id");
    let rows: Vec<RestaurantRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

/// Detail read with awards
pub async fn get(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
) -> Result<Option<Restaurant>, BoxError> {
    let sql = venue::select_by_id_sql(TABLE, EXTRA_COLUMNS);
    let row: Option<RestaurantRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut restaurant = row.into_model(ctx);
    restaurant.awards = awards::list_by_restaurant(pool, ctx, id).await?;
    Ok(Some(restaurant))
}

pub async fn create(
    pool: &PgPool,
    ctx: &MediaContext,
    data: &RestaurantCreate,
) -> Result<Restaurant, BoxError> {
    let new = NewVenue::prepare(pool, TABLE, &data.venue).await?;
    let id = new.id;

    let mut qb = new.insert_into(TABLE, EXTRA_COLUMNS);
    qb.push(", ")
        .push_bind(data.cuisine.clone())
        .push(", ")
        .push_bind(data.price_range)
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
    data: &RestaurantUpdate,
) -> Result<Option<Restaurant>, BoxError> {
    let mut qb = venue::update_set(TABLE, &data.venue)?;
    venue::set(&mut qb, "cuisine", data.cuisine.clone());
    venue::set(&mut qb, "price_range", data.price_range);
    venue::set(&mut qb, "accepts_bookings", data.accepts_bookings);
    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

/// Awards go with the restaurant
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(
        pool,
        TABLE,
        id,
        Some("SELECT image FROM awards WHERE restaurant_id = $1 AND image IS NOT NULL"),
    )
    .await
}

pub struct Restaurants;

impl VenueStore for Restaurants {
    const KIND: VenueKind = VenueKind::Restaurant;

    type Model = Restaurant;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<Restaurant>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Restaurant>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(
        pool: &PgPool,
        ctx: &MediaContext,
        data: &RestaurantCreate,
    ) -> Result<Restaurant, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &RestaurantUpdate,
    ) -> Result<Option<Restaurant>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &RestaurantCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &RestaurantUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &Restaurant) -> i64 {
        model.venue.id
    }

    fn is_active(model: &Restaurant) -> bool {
        model.venue.is_active
    }
}
