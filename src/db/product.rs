//! Product catalog queries

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

/// One catalog row as served to clients
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// Validated fields for a create or full update
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, name, description, price, stock, image_url
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<ProductRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, name, description, price, stock, image_url
        FROM products
        ORDER BY name, id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, input: &ProductInput) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO products (name, description, price, stock, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.stock)
    .bind(&input.image_url)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Full update. Returns whether a row matched.
pub async fn update(pool: &PgPool, id: i64, input: &ProductInput) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = $1, description = $2, price = $3, stock = $4,
            image_url = $5, updated_at = now()
        WHERE id = $6
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.stock)
    .bind(&input.image_url)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a product. Returns the deleted row's `image_url`, or `None`
/// when nothing matched.
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Option<String>>, sqlx::Error> {
    sqlx::query_scalar("DELETE FROM products WHERE id = $1 RETURNING image_url")
        .bind(id)
        .fetch_optional(pool)
        .await
}
