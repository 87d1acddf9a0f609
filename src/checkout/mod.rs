//! Checkout engine
//!
//! Converts a user's cart into a persisted order inside a single
//! transaction:
//!
//! 1. Load cart lines joined with current price and stock, locking the
//!    cart rows (`FOR UPDATE OF c`) so a double-submit from the same user
//!    serializes behind the first attempt.
//! 2. Validate stock per line (pure check, first violation aborts).
//! 3. Compute the total from the prices read in the same pass.
//! 4. Decrement stock with a guarded update (`AND stock >= qty`) - the
//!    storage engine re-evaluates the condition atomically, so two
//!    concurrent checkouts can never drive stock negative even when both
//!    passed step 2.
//! 5. Insert the order header (status `pending`) and one line per item,
//!    snapshotting unit prices.
//! 6. Empty the cart and commit.
//!
//! Every failure path drops the transaction before commit: no order, no
//! lines, no stock change, and the cart stays exactly as it was.

pub mod validate;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;
use validate::CartLine;

/// Everything that can go wrong between "checkout requested" and "order
/// committed". Authentication failures never reach this engine.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for {name} (product {product_id}): only {available} available")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i32,
    },

    /// A concurrent checkout consumed the stock between our validation
    /// read and the guarded decrement.
    #[error("Product {product_id} was sold out by a concurrent checkout, please retry")]
    Conflict { product_id: i64 },

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart | CheckoutError::InsufficientStock { .. } => {
                AppError::Validation(e.to_string())
            }
            CheckoutError::Conflict { .. } => AppError::Conflict(e.to_string()),
            CheckoutError::Storage(err) => AppError::Database(err.to_string()),
        }
    }
}

/// Returned to the client on a committed checkout
#[derive(Debug, Serialize)]
pub struct OrderConfirmation {
    pub order_id: i64,
    pub total: Decimal,
}

/// Run the checkout transaction for an already-authenticated user.
pub async fn checkout(pool: &PgPool, user_id: i64) -> Result<OrderConfirmation, CheckoutError> {
    let mut tx = pool.begin().await?;

    // Price and stock are read inside this transaction, never from an
    // earlier request. Lines are ordered by product_id so concurrent
    // checkouts touch product rows in the same order.
    let lines: Vec<CartLine> = sqlx::query_as(
        r#"
        SELECT c.product_id, p.name, c.quantity, p.price AS unit_price, p.stock
        FROM cart_items c
        JOIN products p ON p.id = c.product_id
        WHERE c.user_id = $1
        ORDER BY c.product_id
        FOR UPDATE OF c
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    // Early exit before any write; the guarded update below remains the
    // authoritative race-safety mechanism.
    validate::validate(&lines).map_err(|v| CheckoutError::InsufficientStock {
        product_id: v.product_id,
        name: v.name,
        available: v.available,
    })?;

    let total = validate::order_total(&lines);

    for line in &lines {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            "#,
        )
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CheckoutError::Conflict {
                product_id: line.product_id,
            });
        }
    }

    let (order_id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (user_id, total, status) VALUES ($1, $2, 'pending') RETURNING id",
    )
    .bind(user_id)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;

    let order_ids: Vec<i64> = lines.iter().map(|_| order_id).collect();
    let product_ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
    let quantities: Vec<i32> = lines.iter().map(|l| l.quantity).collect();
    let unit_prices: Vec<Decimal> = lines.iter().map(|l| l.unit_price).collect();
    sqlx::query(
        r#"
        INSERT INTO order_lines (order_id, product_id, quantity, unit_price)
        SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[], $4::numeric[])
        "#,
    )
    .bind(&order_ids)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&unit_prices)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id, order_id, total = %total, "Checkout committed");

    Ok(OrderConfirmation { order_id, total })
}
