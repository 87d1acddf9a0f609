//! Order history queries
//!
//! Orders are written only by the checkout engine; this module reads the
//! durable record back for the owning user.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLineRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Price captured at checkout time, immune to later catalog changes
    pub unit_price: Decimal,
}

/// An order header with its line items
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithLines {
    pub id: i64,
    pub total: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineRow>,
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<OrderWithLines>, sqlx::Error> {
    let orders: Vec<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, total, status, created_at
        FROM orders
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    if order_ids.is_empty() {
        return Ok(vec![]);
    }

    let lines: Vec<OrderLineRow> = sqlx::query_as(
        r#"
        SELECT order_id, product_id, quantity, unit_price
        FROM order_lines
        WHERE order_id = ANY($1)
        ORDER BY order_id, product_id
        "#,
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut line_map: std::collections::HashMap<i64, Vec<OrderLineRow>> =
        std::collections::HashMap::new();
    for line in lines {
        line_map.entry(line.order_id).or_default().push(line);
    }

    Ok(orders
        .into_iter()
        .map(|o| OrderWithLines {
            lines: line_map.remove(&o.id).unwrap_or_default(),
            id: o.id,
            total: o.total,
            status: o.status,
            created_at: o.created_at,
        })
        .collect())
}
