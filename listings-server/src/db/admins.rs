//! Admin account operations

use shared::models::Admin;
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::BoxError;

/// Login lookup row
#[derive(sqlx::FromRow)]
pub struct AdminCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Emails are matched case-insensitively and stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn create(
    pool: &PgPool,
    email: &str,
    name: Option<&str>,
    password_hash: &str,
) -> Result<Admin, BoxError> {
    let now = now_millis();
    let admin: Admin = sqlx::query_as(
        r#"
        INSERT INTO admins (id, email, name, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, email, name, created_at, updated_at
        "#,
    )
    .bind(snowflake_id())
    .bind(normalize_email(email))
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(admin)
}

pub async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<AdminCredentials>, BoxError> {
    let row: Option<AdminCredentials> =
        sqlx::query_as("SELECT id, email, password_hash FROM admins WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Admin>, BoxError> {
    let row: Option<Admin> =
        sqlx::query_as("SELECT id, email, name, created_at, updated_at FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn password_hash(pool: &PgPool, id: i64) -> Result<Option<String>, BoxError> {
    let hash: Option<String> = sqlx::query_scalar("SELECT password_hash FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

pub async fn update_password(pool: &PgPool, id: i64, password_hash: &str) -> Result<bool, BoxError> {
    let result =
        sqlx::query("UPDATE admins SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(now_millis())
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_password_by_email(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<bool, BoxError> {
    let result =
        sqlx::query("UPDATE admins SET password_hash = $2, updated_at = $3 WHERE email = $1")
            .bind(normalize_email(email))
            .bind(password_hash)
            .bind(now_millis())
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Example.COM "), "admin@example.com");
    }
}
