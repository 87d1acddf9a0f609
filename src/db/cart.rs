//! Cart queries
//!
//! The cart is scoped to one user; every statement filters by `user_id`
//! so one user can never touch another's rows.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

/// One cart row joined with its product, as served to clients
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItemRow {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: i32,
    pub quantity: i32,
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<CartItemRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT c.id, c.product_id, p.name, p.price, p.image_url, p.stock, c.quantity
        FROM cart_items c
        JOIN products p ON p.id = c.product_id
        WHERE c.user_id = $1
        ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Add a product to the cart; adding an existing product increments its
/// quantity instead of duplicating the row.
pub async fn add_item(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove one cart row, only if it belongs to the user. Returns whether a
/// row was actually deleted.
pub async fn remove_item(pool: &PgPool, user_id: i64, item_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
