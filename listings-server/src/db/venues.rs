//! Lookups across venue kinds (by `VenueKind` + id)

use serde_json::Value;
use shared::models::VenueKind;
use sqlx::PgPool;

use super::BoxError;

/// What booking creation and booking emails need to know about a venue
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueTarget {
    pub name: String,
    /// Venue inbox for booking notifications
    pub email: Option<String>,
    pub is_active: bool,
    pub accepts_bookings: bool,
    /// Events only: `ends_at`, or `starts_at` when there is no end
    pub event_end: Option<i64>,
}

fn target_sql(kind: VenueKind) -> String {
    let table = kind.table();
    match kind {
        VenueKind::Restaurant | VenueKind::Eatery | VenueKind::Spa => format!(
            "SELECT name, email, is_active, accepts_bookings, NULL::BIGINT AS event_end \
             FROM {table} WHERE id = $1"
        ),
        VenueKind::Beach | VenueKind::Gym | VenueKind::SwimmingPool => format!(
            "SELECT name, email, is_active, FALSE AS accepts_bookings, NULL::BIGINT AS event_end \
             FROM {table} WHERE id = $1"
        ),
        VenueKind::Event => format!(
            "SELECT name, NULL::TEXT AS email, is_active, TRUE AS accepts_bookings, \
             COALESCE(ends_at, starts_at) AS event_end FROM {table} WHERE id = $1"
        ),
    }
}

pub async fn notification_target(
    pool: &PgPool,
    kind: VenueKind,
    id: i64,
) -> Result<Option<VenueTarget>, BoxError> {
    let sql = target_sql(kind);
    let target: Option<VenueTarget> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(target)
}

pub async fn exists(pool: &PgPool, kind: VenueKind, id: i64) -> Result<bool, BoxError> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", kind.table());
    let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;
    Ok(exists)
}

pub async fn exists_active(pool: &PgPool, kind: VenueKind, id: i64) -> Result<bool, BoxError> {
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND is_active)",
        kind.table()
    );
    let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;
    Ok(exists)
}

/// Name of an active venue (menu notification subject)
pub async fn active_name(pool: &PgPool, kind: VenueKind, id: i64) -> Result<Option<String>, BoxError> {
    let sql = format!("SELECT name FROM {} WHERE id = $1 AND is_active", kind.table());
    let name: Option<String> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;
    Ok(name)
}

/// Raw opening hours of an active venue; `None` when no such venue.
/// Events have no weekly schedule and always yield `None`.
pub async fn opening_hours(
    pool: &PgPool,
    kind: VenueKind,
    id: i64,
) -> Result<Option<Option<Value>>, BoxError> {
    if !kind.has_opening_hours() {
        return Ok(None);
    }
    let sql = format!(
        "SELECT opening_hours FROM {} WHERE id = $1 AND is_active",
        kind.table()
    );
    let hours: Option<Option<Value>> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;
    Ok(hours)
}

/// Every column that may hold a media key, as `(table, column, is_json_array)`
const MEDIA_COLUMNS: &[(&str, &str, bool)] = &[
    ("restaurants", "cover_image", false),
    ("restaurants", "gallery", true),
    ("eateries", "cover_image", false),
    ("eateries", "gallery", true),
    ("beaches", "cover_image", false),
    ("beaches", "gallery", true),
    ("gyms", "cover_image", false),
    ("gyms", "gallery", true),
    ("spas", "cover_image", false),
    ("spas", "gallery", true),
    ("swimming_pools", "cover_image", false),
    ("swimming_pools", "gallery", true),
    ("events", "cover_image", false),
    ("events", "gallery", true),
    ("awards", "image", false),
    ("beach_images", "image", false),
    ("eatery_menus", "file_key", false),
];

fn key_in_use_sql() -> String {
    let branches: Vec<String> = MEDIA_COLUMNS
        .iter()
        .map(|(table, column, is_array)| {
            if *is_array {
                format!("SELECT 1 FROM {table} WHERE {column} @> jsonb_build_array($1::TEXT)")
            } else {
                format!("SELECT 1 FROM {table} WHERE {column} = $1")
            }
        })
        .collect();
    format!("SELECT EXISTS ({})", branches.join(" UNION ALL "))
}

/// Whether any row still references a stored file. Content-addressed keys
/// are shared by identical uploads, so a file is only removed once unused.
pub async fn key_in_use(pool: &PgPool, key: &str) -> Result<bool, BoxError> {
    let sql = key_in_use_sql();
    let used: bool = sqlx::query_scalar(&sql).bind(key).fetch_one(pool).await?;
    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_sql_per_kind() {
        assert!(target_sql(VenueKind::Spa).contains("accepts_bookings, NULL::BIGINT"));
        assert!(target_sql(VenueKind::Gym).contains("FALSE AS accepts_bookings"));
        assert!(target_sql(VenueKind::SwimmingPool).contains("FROM swimming_pools"));
        assert!(target_sql(VenueKind::Event).contains("COALESCE(ends_at, starts_at)"));
    }

    #[test]
    fn test_key_in_use_sql_covers_every_media_column() {
        let sql = key_in_use_sql();
        assert_eq!(sql.matches("UNION ALL").count(), MEDIA_COLUMNS.len() - 1);
        assert!(sql.contains("eatery_menus WHERE file_key = $1"));
        assert!(sql.contains("beaches WHERE gallery @> jsonb_build_array($1::TEXT)"));
    }
}
