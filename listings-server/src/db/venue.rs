//! Columns and query pieces shared by every venue table
//!
//! Each venue table starts with the same seventeen columns; the per-kind
//! modules append their own columns to the builders below.

use serde_json::Value;
use shared::media::{parse_gallery, storage_key};
use shared::models::{VenueDetails, VenueFieldsCreate, VenueFieldsUpdate, VenueListQuery};
use shared::util::{now_millis, slugify, snowflake_id};
use shared::WeeklySchedule;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{BoxError, MediaContext, clean_gallery, clean_image};

/// Common columns, in select and insert bind order
pub const VENUE_COLUMNS: &str = "id, name, slug, description, address, city, latitude, longitude, \
     phone, email, website, cover_image, gallery, opening_hours, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct VenueRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub cover_image: Option<String>,
    pub gallery: Option<Value>,
    pub opening_hours: Option<Value>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl VenueRow {
    /// Resolve image URLs and compute the current opening status
    pub fn into_details(self, ctx: &MediaContext) -> VenueDetails {
        let opening_hours = self
            .opening_hours
            .as_ref()
            .and_then(|value| parse_hours(self.id, value));
        let status = opening_hours
            .as_ref()
            .map(|schedule| schedule.status_now(ctx.tz));

        VenueDetails {
            cover_image: self.cover_image.as_deref().and_then(|raw| ctx.url(raw)),
            gallery: self
                .gallery
                .as_ref()
                .map(|g| shared::media::gallery_urls(g, &ctx.base_url))
                .unwrap_or_default(),
            opening_hours,
            status,
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            address: self.address,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            phone: self.phone,
            email: self.email,
            website: self.website,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A stored schedule that no longer parses is served as "no schedule"
pub fn parse_hours(venue_id: i64, value: &Value) -> Option<WeeklySchedule> {
    if value.is_null() {
        return None;
    }
    match WeeklySchedule::from_value(value) {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            tracing::warn!(venue_id = venue_id, error = %e, "Ignoring unparseable opening hours");
            None
        }
    }
}

// ── Reads ──

pub fn select<'a>(table: &str, extra_columns: &str) -> QueryBuilder<'a, Postgres> {
    QueryBuilder::new(format!(
        "SELECT {VENUE_COLUMNS}, {extra_columns} FROM {table}"
    ))
}

pub fn select_by_id_sql(table: &str, extra_columns: &str) -> String {
    format!("SELECT {VENUE_COLUMNS}, {extra_columns} FROM {table} WHERE id = $1")
}

/// Append WHERE/ORDER/LIMIT for a list query
pub fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &VenueListQuery, order_by: &str) {
    qb.push(" WHERE TRUE");
    if !query.include_inactive {
        qb.push(" AND is_active");
    }
    if let Some(city) = non_empty(query.city.as_deref()) {
        qb.push(" AND city ILIKE ").push_bind(escape_like(city));
    }
    if let Some(search) = non_empty(query.search.as_deref()) {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(query.limit())
        .push(" OFFSET ")
        .push_bind(query.offset());
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Escape LIKE wildcards so user input matches literally
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// A row that was just inserted must be readable
pub fn inserted<T>(row: Option<T>, table: &str, id: i64) -> Result<T, BoxError> {
    row.ok_or_else(|| format!("{table} row {id} missing after insert").into())
}

// ── Slugs ──

/// Slug for `name` that no other row of `table` uses (`name`, `name-2`, ...)
pub async fn unique_slug(pool: &PgPool, table: &str, name: &str) -> Result<String, BoxError> {
    let base = slugify(name);
    let sql = format!("SELECT slug FROM {table} WHERE slug = $1 OR slug LIKE $2");
    let taken: Vec<String> = sqlx::query_scalar(&sql)
        .bind(&base)
        .bind(format!("{}-%", escape_like(&base)))
        .fetch_all(pool)
        .await?;
    Ok(next_free_slug(&base, &taken))
}

pub fn next_free_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..=taken.len() + 1)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| format!("{base}-{}", snowflake_id()))
}

// ── Writes ──

/// Common column values of a row about to be inserted
pub struct NewVenue {
    pub id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
    cover_image: Option<String>,
    gallery: Value,
    opening_hours: Option<Value>,
    is_active: bool,
    now: i64,
}

impl NewVenue {
    pub async fn prepare(
        pool: &PgPool,
        table: &str,
        fields: &VenueFieldsCreate,
    ) -> Result<Self, BoxError> {
        let opening_hours = fields
            .schedule()?
            .map(|schedule| serde_json::to_value(&schedule))
            .transpose()?;
        let name = fields.name.trim().to_string();
        let slug = unique_slug(pool, table, &name).await?;

        Ok(Self {
            id: snowflake_id(),
            slug,
            description: fields.description.clone(),
            address: fields.address.clone(),
            city: fields.city.as_deref().map(|c| c.trim().to_string()),
            latitude: fields.latitude,
            longitude: fields.longitude,
            phone: fields.phone.clone(),
            email: fields.email.as_deref().map(|e| e.trim().to_string()),
            website: fields.website.clone(),
            cover_image: fields.cover_image.as_deref().and_then(clean_image),
            gallery: clean_gallery(fields.gallery.as_deref().unwrap_or_default()),
            opening_hours,
            is_active: fields.is_active.unwrap_or(true),
            now: now_millis(),
            name,
        })
    }

    /// `INSERT INTO {table} (common, extra) VALUES (common binds`: the
    /// caller pushes `, ` + a bind per extra column, then `)`.
    pub fn insert_into<'a>(self, table: &str, extra_columns: &str) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {table} ({VENUE_COLUMNS}, {extra_columns}) VALUES ("
        ));
        let mut values = qb.separated(", ");
        values
            .push_bind(self.id)
            .push_bind(self.name)
            .push_bind(self.slug)
            .push_bind(self.description)
            .push_bind(self.address)
            .push_bind(self.city)
            .push_bind(self.latitude)
            .push_bind(self.longitude)
            .push_bind(self.phone)
            .push_bind(self.email)
            .push_bind(self.website)
            .push_bind(self.cover_image)
            .push_bind(self.gallery)
            .push_bind(self.opening_hours)
            .push_bind(self.is_active)
            .push_bind(self.now)
            .push_bind(self.now);
        qb
    }
}

/// Append `, column = $n` when a value is given
pub fn set<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: Option<T>)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value);
    }
}

/// `UPDATE {table} SET updated_at = now` plus every provided common field.
/// The slug is kept when the name changes so public links stay valid.
pub fn update_set<'a>(
    table: &str,
    fields: &VenueFieldsUpdate,
) -> Result<QueryBuilder<'a, Postgres>, BoxError> {
    let mut qb = QueryBuilder::new(format!("UPDATE {table} SET updated_at = "));
    qb.push_bind(now_millis());

    set(&mut qb, "name", fields.name.as_deref().map(|n| n.trim().to_string()));
    set(&mut qb, "description", fields.description.clone());
    set(&mut qb, "address", fields.address.clone());
    set(&mut qb, "city", fields.city.as_deref().map(|c| c.trim().to_string()));
    set(&mut qb, "latitude", fields.latitude);
    set(&mut qb, "longitude", fields.longitude);
    set(&mut qb, "phone", fields.phone.clone());
    set(&mut qb, "email", fields.email.as_deref().map(|e| e.trim().to_string()));
    set(&mut qb, "website", fields.website.clone());
    set(&mut qb, "is_active", fields.is_active);
    if let Some(raw) = &fields.cover_image {
        qb.push(", cover_image = ").push_bind(clean_image(raw));
    }
    set(&mut qb, "gallery", fields.gallery.as_deref().map(clean_gallery));
    if fields.opening_hours.is_some() {
        let opening_hours = fields
            .schedule()?
            .map(|schedule| serde_json::to_value(&schedule))
            .transpose()?;
        qb.push(", opening_hours = ").push_bind(opening_hours);
    }
    Ok(qb)
}

/// Run an update built by [`update_set`]; `false` when the row does not exist
pub async fn finish_update(
    mut qb: QueryBuilder<'_, Postgres>,
    pool: &PgPool,
    id: i64,
) -> Result<bool, BoxError> {
    qb.push(" WHERE id = ").push_bind(id);
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a venue row (children cascade) and collect the media keys it and
/// its children referenced. `child_keys_sql` selects child keys by `$1 = id`.
pub async fn delete(
    pool: &PgPool,
    table: &str,
    id: i64,
    child_keys_sql: Option<&str>,
) -> Result<Option<Vec<String>>, BoxError> {
    let mut tx = pool.begin().await?;

    let mut keys: Vec<String> = match child_keys_sql {
        Some(sql) => sqlx::query_scalar(sql).bind(id).fetch_all(&mut *tx).await?,
        None => Vec::new(),
    };

    let sql = format!("DELETE FROM {table} WHERE id = $1 RETURNING cover_image, gallery");
    let row: Option<(Option<String>, Option<Value>)> =
        sqlx::query_as(&sql).bind(id).fetch_optional(&mut *tx).await?;
    let Some((cover_image, gallery)) = row else {
        return Ok(None);
    };
    tx.commit().await?;

    keys.extend(cover_image);
    if let Some(gallery) = gallery {
        keys.extend(parse_gallery(&gallery));
    }
    Ok(Some(local_keys(keys)))
}

/// Keys of files in local storage (absolute URLs dropped), deduplicated
pub fn local_keys(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw {
        if let Some(key) = storage_key(&item)
            && !out.contains(&key)
        {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(opening_hours: Option<Value>) -> VenueRow {
        VenueRow {
            id: 1,
            name: "El Faro".into(),
            slug: "el-faro".into(),
            description: None,
            address: None,
            city: Some("Málaga".into()),
            latitude: None,
            longitude: None,
            phone: None,
            email: None,
            website: None,
            cover_image: Some("/storage/venues/a.jpg".into()),
            gallery: Some(json!("[\"gallery/b.jpg\", \"https://x.org/c.jpg\"]")),
            opening_hours,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ctx() -> MediaContext {
        MediaContext::new("http://localhost:8080/media", chrono_tz::Europe::Madrid)
    }

    #[test]
    fn test_into_details_resolves_urls() {
        let details = row(None).into_details(&ctx());
        assert_eq!(
            details.cover_image.as_deref(),
            Some("http://localhost:8080/media/venues/a.jpg")
        );
        assert_eq!(
            details.gallery,
            vec![
                "http://localhost:8080/media/gallery/b.jpg",
                "https://x.org/c.jpg"
            ]
        );
        assert!(details.opening_hours.is_none());
        assert!(details.status.is_none());
    }

    #[test]
    fn test_into_details_computes_status() {
        let details = row(Some(json!({"mon": "24h"}))).into_details(&ctx());
        assert!(details.opening_hours.is_some());
        assert!(details.status.is_some());
    }

    #[test]
    fn test_broken_hours_are_dropped() {
        let details = row(Some(json!({"funday": "10:00-12:00"}))).into_details(&ctx());
        assert!(details.opening_hours.is_none());
        assert!(details.status.is_none());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("playa"), "playa");
    }

    #[test]
    fn test_next_free_slug() {
        assert_eq!(next_free_slug("el-faro", &[]), "el-faro");
        assert_eq!(
            next_free_slug("el-faro", &["el-faro".into(), "el-faro-2".into()]),
            "el-faro-3"
        );
        // suffixed rows alone do not block the base slug
        assert_eq!(next_free_slug("el-faro", &["el-faro-2".into()]), "el-faro");
        assert_eq!(
            next_free_slug("el-faro", &["el-faro".into(), "el-faro-grill".into()]),
            "el-faro-2"
        );
    }

    #[test]
    fn test_local_keys() {
        let keys = local_keys(vec![
            "venues/a.jpg".to_string(),
            "/storage/venues/a.jpg".to_string(),
            "https://cdn.example.com/x.jpg".to_string(),
            "menus/b.pdf".to_string(),
        ]);
        assert_eq!(keys, vec!["venues/a.jpg", "menus/b.pdf"]);
    }

    #[test]
    fn test_update_set_rejects_bad_hours() {
        let fields = VenueFieldsUpdate {
            opening_hours: Some(json!({"funday": "x"})),
            ..Default::default()
        };
        let err = update_set("restaurants", &fields).err().unwrap();
        let app = err.downcast_ref::<shared::AppError>().unwrap();
        assert_eq!(app.code, shared::ErrorCode::OpeningHoursInvalid);
    }

    #[test]
    fn test_update_set_builds_sql() {
        let fields = VenueFieldsUpdate {
            name: Some(" Nuevo ".into()),
            cover_image: Some(String::new()),
            ..Default::default()
        };
        let qb = update_set("restaurants", &fields).unwrap();
        let sql = qb.sql();
        assert!(sql.starts_with("UPDATE restaurants SET updated_at = $1"));
        assert!(sql.contains(", name = $2"));
        assert!(sql.contains(", cover_image = $3"));
        assert!(!sql.contains("slug"));
    }
}
