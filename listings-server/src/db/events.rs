//! Event database operations

use rust_decimal::Decimal;
use serde_json::Value;
use shared::error::AppResult;
use shared::models::{
    Event, EventCreate, EventUpdate, VenueKind, VenueListQuery, validate_event_range,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, QueryBuilder};

use super::venue;
use super::{BoxError, MediaContext, VenueStore, clean_gallery, clean_image};

const TABLE: &str = "events";
const COLUMNS: &str = "id, name, slug, description, venue_name, address, city, latitude, \
     longitude, starts_at, ends_at, cover_image, gallery, ticket_url, price, is_active, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    venue_name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    starts_at: i64,
    ends_at: Option<i64>,
    cover_image: Option<String>,
    gallery: Option<Value>,
    ticket_url: Option<String>,
    price: Option<Decimal>,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl EventRow {
    fn into_model(self, ctx: &MediaContext) -> Event {
        Event {
            cover_image: self.cover_image.as_deref().and_then(|raw| ctx.url(raw)),
            gallery: self
                .gallery
                .as_ref()
                .map(|g| shared::media::gallery_urls(g, &ctx.base_url))
                .unwrap_or_default(),
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            venue_name: self.venue_name,
            address: self.address,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            ticket_url: self.ticket_url,
            price: self.price,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Soonest first
pub async fn list(
    pool: &PgPool,
    ctx: &MediaContext,
    query: &VenueListQuery,
) -> Result<Vec<Event>, BoxError> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {TABLE}"));
    venue::push_filters(&mut qb, query, "starts_at, id");
    let rows: Vec<EventRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.into_model(ctx)).collect())
}

pub async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Event>, BoxError> {
    let sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1");
    let row: Option<EventRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|r| r.into_model(ctx)))
}

pub async fn create(
    pool: &PgPool,
    ctx: &MediaContext,
    data: &EventCreate,
) -> Result<Event, BoxError> {
    let name = data.name.trim();
    let slug = venue::unique_slug(pool, TABLE, name).await?;
    let now = now_millis();

    let sql = format!(
        r#"
        INSERT INTO events (
            id, name, slug, description, venue_name, address, city, latitude,
            longitude, starts_at, ends_at, cover_image, gallery, ticket_url, price,
            is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $17)
        RETURNING {COLUMNS}
        "#
    );
    let row: EventRow = sqlx::query_as(&sql)
        .bind(snowflake_id())
        .bind(name)
        .bind(&slug)
        .bind(&data.description)
        .bind(&data.venue_name)
        .bind(&data.address)
        .bind(data.city.as_deref().map(str::trim))
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(data.cover_image.as_deref().and_then(clean_image))
        .bind(clean_gallery(data.gallery.as_deref().unwrap_or_default()))
        .bind(&data.ticket_url)
        .bind(data.price)
        .bind(data.is_active.unwrap_or(true))
        .bind(now)
        .fetch_one(pool)
        .await?;
    Ok(row.into_model(ctx))
}

/// The start/end pair is re-checked against the stored values
pub async fn update(
    pool: &PgPool,
    ctx: &MediaContext,
    id: i64,
    data: &EventUpdate,
) -> Result<Option<Event>, BoxError> {
    let Some(current) = get(pool, ctx, id).await? else {
        return Ok(None);
    };
    validate_event_range(
        Some(data.starts_at.unwrap_or(current.starts_at)),
        data.ends_at.or(current.ends_at),
    )?;

    let mut qb = QueryBuilder::new(format!("UPDATE {TABLE} SET updated_at = "));
    qb.push_bind(now_millis());
    venue::set(&mut qb, "name", data.name.as_deref().map(|n| n.trim().to_string()));
    venue::set(&mut qb, "description", data.description.clone());
    venue::set(&mut qb, "venue_name", data.venue_name.clone());
    venue::set(&mut qb, "address", data.address.clone());
    venue::set(&mut qb, "city", data.city.as_deref().map(|c| c.trim().to_string()));
    venue::set(&mut qb, "latitude", data.latitude);
    venue::set(&mut qb, "longitude", data.longitude);
    venue::set(&mut qb, "starts_at", data.starts_at);
    venue::set(&mut qb, "ends_at", data.ends_at);
    venue::set(&mut qb, "ticket_url", data.ticket_url.clone());
    venue::set(&mut qb, "price", data.price);
    venue::set(&mut qb, "is_active", data.is_active);
    if let Some(raw) = &data.cover_image {
        qb.push(", cover_image = ").push_bind(clean_image(raw));
    }
    venue::set(&mut qb, "gallery", data.gallery.as_deref().map(clean_gallery));

    if !venue::finish_update(qb, pool, id).await? {
        return Ok(None);
    }
    get(pool, ctx, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
    venue::delete(pool, TABLE, id, None).await
}

pub struct Events;

impl VenueStore for Events {
    const KIND: VenueKind = VenueKind::Event;

    type Model = Event;
    type Create = EventCreate;
    type Update = EventUpdate;

    async fn list(
        pool: &PgPool,
        ctx: &MediaContext,
        query: &VenueListQuery,
    ) -> Result<Vec<Event>, BoxError> {
        list(pool, ctx, query).await
    }

    async fn get(pool: &PgPool, ctx: &MediaContext, id: i64) -> Result<Option<Event>, BoxError> {
        get(pool, ctx, id).await
    }

    async fn create(pool: &PgPool, ctx: &MediaContext, data: &EventCreate) -> Result<Event, BoxError> {
        create(pool, ctx, data).await
    }

    async fn update(
        pool: &PgPool,
        ctx: &MediaContext,
        id: i64,
        data: &EventUpdate,
    ) -> Result<Option<Event>, BoxError> {
        update(pool, ctx, id, data).await
    }

    async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, BoxError> {
        delete(pool, id).await
    }

    fn validate_create(data: &EventCreate) -> AppResult<()> {
        data.validate()
    }

    fn validate_update(data: &EventUpdate) -> AppResult<()> {
        data.validate()
    }

    fn id(model: &Event) -> i64 {
        model.id
    }

    fn is_active(model: &Event) -> bool {
        model.is_active
    }
}
